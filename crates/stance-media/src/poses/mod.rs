//! Pose templates.
//!
//! Each template is a [`PosePredicate`] over one frame's landmarks. The
//! frame loop evaluates every predicate in a [`PoseRegistry`] uniformly, so
//! adding a template means registering a new predicate rather than touching
//! the analyzer.

pub mod t_pose;

use std::sync::Arc;

use stance_models::PoseLandmarks;

use crate::error::{MediaError, MediaResult};

pub use t_pose::{TPose, TPoseConfig};

/// A named geometric pose template.
pub trait PosePredicate: Send + Sync {
    /// Name reported in analysis summaries (e.g. `"T-Pose"`).
    fn name(&self) -> &'static str;

    /// Whether the landmarks match this pose.
    fn evaluate(&self, landmarks: &PoseLandmarks) -> bool;
}

/// Ordered set of pose predicates with unique names.
#[derive(Clone, Default)]
pub struct PoseRegistry {
    predicates: Vec<Arc<dyn PosePredicate>>,
}

impl PoseRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in templates.
    pub fn builtin() -> Self {
        Self {
            predicates: vec![Arc::new(TPose::default())],
        }
    }

    /// Register a predicate. Names must be unique.
    pub fn register(&mut self, predicate: Arc<dyn PosePredicate>) -> MediaResult<()> {
        if self.contains(predicate.name()) {
            return Err(MediaError::DuplicatePose(predicate.name().to_string()));
        }
        self.predicates.push(predicate);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, predicate: Arc<dyn PosePredicate>) -> MediaResult<Self> {
        self.register(predicate)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.iter().any(|p| p.name() == name)
    }

    /// Pose names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.predicates.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Names of the poses matched by one frame, in registration order.
    pub fn matches(&self, landmarks: &PoseLandmarks) -> Vec<&'static str> {
        self.predicates
            .iter()
            .filter(|p| p.evaluate(landmarks))
            .map(|p| p.name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(&'static str);

    impl PosePredicate for Always {
        fn name(&self) -> &'static str {
            self.0
        }

        fn evaluate(&self, _landmarks: &PoseLandmarks) -> bool {
            true
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = PoseRegistry::builtin();
        assert_eq!(registry.names(), vec!["T-Pose"]);
        assert!(registry.contains("T-Pose"));
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = PoseRegistry::builtin();
        let err = registry.register(Arc::new(Always("T-Pose"))).unwrap_err();
        assert!(matches!(err, MediaError::DuplicatePose(name) if name == "T-Pose"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_matches_preserves_registration_order() {
        let registry = PoseRegistry::new()
            .with(Arc::new(Always("B")))
            .and_then(|r| r.with(Arc::new(Always("A"))))
            .unwrap();
        assert_eq!(registry.matches(&PoseLandmarks::zeroed()), vec!["B", "A"]);
    }
}
