//! Capability handles and the control-keyed registry.

use crate::validator::FieldValidator;
use fieldguard_core::ElementId;
use fieldguard_log::debug;
use fieldguard_validation::Violations;
use parking_lot::RwLock;
use std::collections::HashMap;

/// What external code may do with a bound control without holding the
/// validator itself.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldHandle {
    validator: FieldValidator,
}

impl FieldHandle {
    pub(crate) fn new(validator: FieldValidator) -> Self {
        Self { validator }
    }

    /// Re-evaluate the control.
    pub fn is_valid(&self) -> bool {
        self.validator.is_valid()
    }

    pub fn set_valid(&self) {
        self.validator.set_valid();
    }

    pub fn set_invalid(&self) {
        self.validator.set_invalid();
    }

    pub fn errors(&self) -> Vec<String> {
        self.validator.errors()
    }

    pub fn violations(&self) -> Violations {
        self.validator.violations()
    }

    pub fn control(&self) -> ElementId {
        self.validator.control()
    }

    /// Back-reference to the validator.
    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }
}

/// Validators keyed by the control they are bound to.
///
/// Element ids are only unique per surface, so keep one registry per
/// surface.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: RwLock<HashMap<ElementId, FieldValidator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` under its control and return its handle.
    ///
    /// A validator previously registered for the same control has its
    /// listeners removed.
    pub fn register(&self, validator: FieldValidator) -> FieldHandle {
        let handle = validator.handle();
        let previous = self
            .validators
            .write()
            .insert(validator.control(), validator);

        if let Some(previous) = previous
            && previous != *handle.validator()
        {
            debug!("Replacing validator for {}", previous.control());
            previous.remove_listeners();
        }
        handle
    }

    pub fn get(&self, control: ElementId) -> Option<FieldValidator> {
        self.validators.read().get(&control).cloned()
    }

    pub fn handle(&self, control: ElementId) -> Option<FieldHandle> {
        self.get(control).map(|validator| validator.handle())
    }

    /// Unregister and detach the validator bound to `control`.
    pub fn remove(&self, control: ElementId) -> Option<FieldValidator> {
        let removed = self.validators.write().remove(&control)?;
        removed.remove_listeners();
        Some(removed)
    }

    pub fn contains(&self, control: ElementId) -> bool {
        self.validators.read().contains_key(&control)
    }

    /// Registered controls in ascending id order.
    pub fn controls(&self) -> Vec<ElementId> {
        let mut controls: Vec<_> = self.validators.read().keys().copied().collect();
        controls.sort();
        controls
    }

    pub fn len(&self) -> usize {
        self.validators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.read().is_empty()
    }
}
