use ndarray::ArrayView1;
use std::fmt;
use std::sync::Arc;

/// A function of a decision vector and its objective vector
pub type ConstraintFn = Arc<dyn Fn(&ArrayView1<f64>, &ArrayView1<f64>) -> f64 + Send + Sync>;

/// A constraint on a (decision vector, objective vector) pair.
///
/// Positive or null values mean the constraint is satisfied, negative ones that it is violated.
#[derive(Clone)]
pub struct ScalarConstraint {
    name: String,
    function: ConstraintFn,
}

impl ScalarConstraint {
    /// Constructor
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&ArrayView1<f64>, &ArrayView1<f64>) -> f64 + Send + Sync + 'static,
    {
        ScalarConstraint {
            name: name.into(),
            function: Arc::new(function),
        }
    }

    /// Name of the constraint
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constraint value for decision vector `x` and objective vector `f`
    pub fn evaluate(&self, x: &ArrayView1<f64>, f: &ArrayView1<f64>) -> f64 {
        (self.function)(x, f)
    }
}

impl fmt::Debug for ScalarConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarConstraint")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_constraint() {
        // f1 <= 1
        let cstr = ScalarConstraint::new("f1 <= 1", |_x: &ArrayView1<f64>, f: &ArrayView1<f64>| {
            1. - f[0]
        });
        assert_eq!(cstr.name(), "f1 <= 1");
        assert_eq!(cstr.evaluate(&array![0.].view(), &array![0.5].view()), 0.5);
        assert!(cstr.evaluate(&array![0.].view(), &array![2.].view()) < 0.);
    }
}
