/// Deterministically consumes genes from a search vector.
///
/// The decoder validates the vector length against the dimensionality
/// formula before reading, so the cursor never runs past the end.
pub struct GeneCursor<'a> {
    genes: &'a [f64],
    position: usize,
}

impl<'a> GeneCursor<'a> {
    pub fn new(genes: &'a [f64]) -> Self {
        Self { genes, position: 0 }
    }

    /// Consume the next gene and return its value.
    pub fn consume(&mut self) -> f64 {
        let gene = self.genes[self.position];
        self.position += 1;
        gene
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_advances_in_order() {
        let genes = [0.1, 0.2, 0.3];
        let mut cursor = GeneCursor::new(&genes);
        assert_eq!(cursor.consume(), 0.1);
        assert_eq!(cursor.consume(), 0.2);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.consume(), 0.3);
    }
}
