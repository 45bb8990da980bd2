/// Resource limits applied while compiling
///
/// Evaluation has no timeout of its own. Its cost is bounded by the size of
/// the compiled tree, so these limits are checked before and during
/// compilation instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum expression source size in bytes
    /// Real usage: ~100 bytes, Limit: 64KB
    pub max_source_bytes: usize,

    /// Maximum nesting of parentheses, unary operators and conditionals
    /// Real usage: ~3 levels, Limit: 100 (30x+)
    pub max_expression_depth: usize,

    /// Maximum height of the compiled tree, which long operator chains such
    /// as `a + b + c + ...` grow one level per operator
    /// Real usage: ~10 levels, Limit: 1000
    pub max_tree_height: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_source_bytes: 64 * 1024, // 64 KB
            max_expression_depth: 100,
            max_tree_height: 1000,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_source_bytes(mut self, bytes: usize) -> Self {
        self.max_source_bytes = bytes;
        self
    }

    pub fn with_max_expression_depth(mut self, depth: usize) -> Self {
        self.max_expression_depth = depth;
        self
    }

    pub fn with_max_tree_height(mut self, height: usize) -> Self {
        self.max_tree_height = height;
        self
    }
}
