/// Fixed-point rendering for printed quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFormat {
    pub digits: usize,
}

impl Default for FixedFormat {
    fn default() -> Self {
        Self { digits: 6 }
    }
}

impl FixedFormat {
    pub fn new(digits: usize) -> Self {
        Self { digits }
    }

    pub fn render(&self, value: f64) -> String {
        format!("{:.*}", self.digits, value)
    }
}
