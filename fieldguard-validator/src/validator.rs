// Field validator: event wiring, evaluation pipeline, feedback rendering

use crate::companion::{self, COMPANION_EVENTS, ENHANCED_TAG, PROBE_DELAY};
use crate::container;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::registry::FieldHandle;
use fieldguard_config::{ConfigError, ErrorDisplay, FieldConfig, Validate};
use fieldguard_core::{
    Control, ControlRef, ElementId, EnhancementRuntime, FieldEvent, Listener, ListenerId, Surface,
};
use fieldguard_log::{debug, info, trace};
use fieldguard_validation::{CustomValidator, Matches, RuleSet, Violations};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};

/// Class put on every control a validator is bound to.
pub const WILL_VALIDATE_CLASS: &str = "will-validate";

/// Container state class toggled by [`FieldValidator::set_valid`].
pub const FEEDBACK_VALID_CLASS: &str = "feedback-valid";

/// Container state class toggled by [`FieldValidator::set_invalid`].
pub const FEEDBACK_INVALID_CLASS: &str = "feedback-invalid";

/// Attribute written in inline display mode.
pub const TITLE_ATTRIBUTE: &str = "title";

/// Tag of each message child appended to the container.
const MESSAGE_TAG: &str = "div";

/// Where a control stands in its validation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Never evaluated
    Pristine,
    /// Last evaluation passed
    Valid,
    /// Last evaluation produced violations
    Invalid,
    /// Evaluated before, then cleared by [`FieldValidator::reset`]
    Cleared,
}

#[derive(Default)]
struct State {
    violations: Violations,
    outcome: Option<bool>,
    validated: bool,
    container: Option<ElementId>,
    companion: Option<ElementId>,
    listeners: Vec<ListenerId>,
    companion_subscription: Option<ListenerId>,
}

struct Inner {
    surface: Arc<dyn Surface>,
    control: ElementId,
    config: FieldConfig,
    rules: RwLock<RuleSet>,
    state: Mutex<State>,
    live: Debouncer,
    probe: Debouncer,
    runtime: Option<Arc<dyn EnhancementRuntime>>,
}

/// Validates one form control and renders its feedback.
///
/// A `FieldValidator` is a cheap handle; clones share the same state.
/// Event listeners installed on the surface hold only a weak reference,
/// so dropping every handle stops evaluation without detaching anything.
///
/// # Examples
///
/// ```
/// use fieldguard_config::FieldConfig;
/// use fieldguard_testing::MemorySurface;
/// use fieldguard_validator::FieldValidator;
///
/// let surface = MemorySurface::new();
/// let input = surface.append(None, "input");
/// surface.set_id(input, "name");
///
/// let config = FieldConfig::default().with_min_length(5);
/// let validator = FieldValidator::new(surface.shared(), "#name", config).unwrap();
///
/// surface.set_value(input, "abc");
/// assert!(!validator.is_valid());
/// assert_eq!(
///     validator.errors(),
///     vec!["This field must be at least 5 characters long."]
/// );
/// ```
#[derive(Clone)]
pub struct FieldValidator {
    inner: Arc<Inner>,
}

/// Builder for [`FieldValidator`].
pub struct ValidatorBuilder {
    surface: Arc<dyn Surface>,
    control: ControlRef,
    config: FieldConfig,
    validators: Vec<Arc<dyn CustomValidator>>,
    runtime: Option<Arc<dyn EnhancementRuntime>>,
}

impl ValidatorBuilder {
    pub fn config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Merge a JSON overlay over the default configuration.
    pub fn overlay(mut self, overlay: Value) -> Result<Self> {
        self.config = FieldConfig::from_overlay(overlay)?;
        Ok(self)
    }

    /// Append a custom validator. Validators run in the order added.
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str, &Control) -> Option<String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn validators(mut self, validators: Vec<Arc<dyn CustomValidator>>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// Inject the runtime used for companion widget notifications.
    pub fn runtime(mut self, runtime: Arc<dyn EnhancementRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Resolve the control, bind listeners and tag the control.
    pub fn build(self) -> Result<FieldValidator> {
        let control = self.control.resolve(self.surface.as_ref())?;
        self.config.validate()?;

        let mut rules = compile_rules(&self.config)?;
        for validator in self.validators {
            rules.push_validator(validator);
        }

        let validator = FieldValidator {
            inner: Arc::new(Inner {
                surface: self.surface,
                control,
                rules: RwLock::new(rules),
                state: Mutex::new(State {
                    companion: self.config.companion,
                    ..State::default()
                }),
                config: self.config,
                live: Debouncer::new(),
                probe: Debouncer::new(),
                runtime: self.runtime,
            }),
        };

        let inner = &validator.inner;
        inner.surface.add_class(control, WILL_VALIDATE_CLASS);
        validator.add_listeners();

        debug!(
            "Validator bound to {} ({} custom validators)",
            control,
            inner.rules.read().custom_count()
        );
        Ok(validator)
    }
}

fn compile_rules(config: &FieldConfig) -> std::result::Result<RuleSet, ConfigError> {
    let mut rules = RuleSet::new()
        .required(config.required)
        .email(config.is_email);
    if let Some(min) = config.min_length {
        rules = rules.min_length(min);
    }
    if let Some(max) = config.max_length {
        rules = rules.max_length(max);
    }
    if let Some(pattern) = &config.pattern {
        let matches = Matches::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        rules = rules.pattern(matches);
    }
    Ok(rules)
}

impl FieldValidator {
    pub fn builder(surface: Arc<dyn Surface>, control: impl Into<ControlRef>) -> ValidatorBuilder {
        ValidatorBuilder {
            surface,
            control: control.into(),
            config: FieldConfig::default(),
            validators: Vec::new(),
            runtime: None,
        }
    }

    /// Bind a validator to `control` with `config`.
    pub fn new(
        surface: Arc<dyn Surface>,
        control: impl Into<ControlRef>,
        config: FieldConfig,
    ) -> Result<Self> {
        Self::builder(surface, control).config(config).build()
    }

    /// Bind a validator configured by a JSON overlay on the defaults.
    pub fn with_overlay(
        surface: Arc<dyn Surface>,
        control: impl Into<ControlRef>,
        overlay: Value,
    ) -> Result<Self> {
        Self::builder(surface, control).overlay(overlay)?.build()
    }

    pub fn control(&self) -> ElementId {
        self.inner.control
    }

    pub fn config(&self) -> &FieldConfig {
        &self.inner.config
    }

    /// Capability handle for external callers.
    pub fn handle(&self) -> FieldHandle {
        FieldHandle::new(self.clone())
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Run every rule against the current value and render the outcome.
    ///
    /// Returns true when no rule is violated.
    pub fn validate(&self) -> bool {
        self.reset();

        let inner = &self.inner;
        let value = inner.surface.value(inner.control);
        let control = Control::new(inner.control, inner.surface.clone());
        let rules = inner.rules.read().clone();
        let violations = rules.evaluate(&value, &control);

        inner
            .surface
            .set_custom_validity(inner.control, violations.first_message().unwrap_or(""));

        let valid = violations.is_empty();
        {
            let mut state = inner.state.lock();
            state.violations = violations;
            state.outcome = Some(valid);
        }

        self.display_feedback();
        info!("Validating {}", valid);
        valid
    }

    /// Re-evaluates; this is not a cached read.
    pub fn is_valid(&self) -> bool {
        self.validate()
    }

    /// Messages from the last evaluation, in rule order.
    pub fn errors(&self) -> Vec<String> {
        self.inner.state.lock().violations.messages()
    }

    pub fn violations(&self) -> Violations {
        self.inner.state.lock().violations.clone()
    }

    pub fn state(&self) -> FieldState {
        let state = self.inner.state.lock();
        match (state.validated, state.outcome) {
            (false, _) => FieldState::Pristine,
            (true, Some(true)) => FieldState::Valid,
            (true, Some(false)) => FieldState::Invalid,
            (true, None) => FieldState::Cleared,
        }
    }

    /// Append a custom validator after those already registered.
    pub fn add_custom_validator<F>(&self, validator: F)
    where
        F: Fn(&str, &Control) -> Option<String> + Send + Sync + 'static,
    {
        self.inner.rules.write().push_validator(Arc::new(validator));
    }

    /// Clear messages, validity classes, the native validity message and
    /// the container content. The was-validated class is kept.
    pub fn reset(&self) {
        let inner = &self.inner;
        let (surface, control, config) = (&inner.surface, inner.control, &inner.config);

        surface.remove_class(control, &config.class_valid);
        surface.remove_class(control, &config.class_invalid);
        surface.set_custom_validity(control, "");

        {
            let mut state = inner.state.lock();
            state.violations = Violations::new();
            state.outcome = None;
        }

        if let Some(container) = self.error_container() {
            surface.clear_content(container);
        }
        if config.error_display == ErrorDisplay::Inline {
            surface.remove_attribute(control, TITLE_ATTRIBUTE);
        }
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    /// Render the last evaluation on the surface.
    pub fn display_feedback(&self) {
        let inner = &self.inner;
        let (surface, control, config) = (&inner.surface, inner.control, &inner.config);

        surface.add_class(control, &config.class_was_validated);
        let messages = {
            let mut state = inner.state.lock();
            state.validated = true;
            state.violations.messages()
        };

        if messages.is_empty() {
            self.set_valid();
            self.display_success();
            return;
        }

        self.set_invalid();
        match config.error_display {
            ErrorDisplay::Container => match self.error_container() {
                Some(container) => {
                    surface.clear_content(container);
                    for message in &messages {
                        surface.append_text_child(container, MESSAGE_TAG, message);
                    }
                }
                None => debug!("No feedback container for {}", control),
            },
            ErrorDisplay::Inline => {
                if let Some(first) = messages.first() {
                    surface.set_attribute(control, TITLE_ATTRIBUTE, first);
                }
            }
            ErrorDisplay::Silent => info!("{:?}", messages),
        }
    }

    fn display_success(&self) {
        let config = &self.inner.config;
        if config.success_message.is_empty() {
            return;
        }

        if config.error_display != ErrorDisplay::Container {
            info!("{}", config.success_message);
            return;
        }
        match self.error_container() {
            Some(container) => self
                .inner
                .surface
                .set_text(container, &config.success_message),
            None => debug!("No feedback container for {}", self.inner.control),
        }
    }

    pub fn set_valid(&self) {
        self.apply_state(true);
    }

    pub fn set_invalid(&self) {
        self.apply_state(false);
    }

    fn apply_state(&self, valid: bool) {
        let inner = &self.inner;
        let (surface, control, config) = (&inner.surface, inner.control, &inner.config);

        let (add, remove) = if valid {
            (&config.class_valid, &config.class_invalid)
        } else {
            (&config.class_invalid, &config.class_valid)
        };
        surface.add_class(control, add);
        surface.remove_class(control, remove);

        if config.error_display == ErrorDisplay::Container
            && let Some(container) = self.error_container()
        {
            let (add, remove) = if valid {
                (FEEDBACK_VALID_CLASS, FEEDBACK_INVALID_CLASS)
            } else {
                (FEEDBACK_INVALID_CLASS, FEEDBACK_VALID_CLASS)
            };
            surface.add_class(container, add);
            surface.remove_class(container, remove);
        }

        if let Some(companion) = self.companion() {
            surface.add_class(companion, add);
            surface.remove_class(companion, remove);
        }
    }

    /// The configured container, or the first feedback sibling found
    /// after the control. A discovered container is cached.
    pub fn error_container(&self) -> Option<ElementId> {
        let inner = &self.inner;
        if let Some(explicit) = inner.config.error_container {
            return Some(explicit);
        }

        let mut state = inner.state.lock();
        if state.container.is_none() {
            state.container = container::discover(inner.surface.as_ref(), inner.control);
            if let Some(found) = state.container {
                debug!("Feedback container {} adopted for {}", found, inner.control);
            }
        }
        state.container
    }

    pub fn companion(&self) -> Option<ElementId> {
        self.inner.state.lock().companion
    }

    // ========================================================================
    // Companion widget
    // ========================================================================

    /// Adopt the rendered companion widget and subscribe its notifications.
    ///
    /// Returns true once the runtime subscription is in place.
    pub fn init_companion(&self) -> bool {
        let inner = &self.inner;
        let companion = {
            let mut state = inner.state.lock();
            if state.companion.is_none() {
                state.companion = companion::probe(inner.surface.as_ref(), inner.control);
            }
            state.companion
        };

        let Some(companion) = companion else {
            debug!("No companion widget for {}", inner.control);
            return false;
        };
        let Some(runtime) = &inner.runtime else {
            debug!("Companion {} found but no enhancement runtime", companion);
            return false;
        };

        if inner.state.lock().companion_subscription.is_some() {
            return true;
        }

        // The state lock must not be held here: a runtime may notify at once.
        let subscription = runtime.subscribe(
            inner.control,
            &COMPANION_EVENTS,
            self.listener(|validator| {
                validator.validate();
            }),
        );

        let mut state = inner.state.lock();
        if state.companion_subscription.is_some() {
            drop(state);
            runtime.unsubscribe(subscription);
        } else {
            state.companion_subscription = Some(subscription);
            debug!("Companion {} wired as {}", companion, subscription);
        }
        true
    }

    fn schedule_companion_probe(&self) {
        let weak = Arc::downgrade(&self.inner);
        self.inner.probe.schedule(PROBE_DELAY, move || {
            if let Some(inner) = weak.upgrade() {
                FieldValidator { inner }.init_companion();
            }
        });
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Bind input, blur (when enabled) and key-up listeners.
    ///
    /// A `SELECT` without an adopted companion gets a fresh companion probe.
    /// Does nothing if the listeners are already bound.
    pub fn add_listeners(&self) {
        let inner = &self.inner;
        let (surface, control) = (&inner.surface, inner.control);
        let mut state = inner.state.lock();
        if !state.listeners.is_empty() {
            return;
        }

        let evaluate = |validator: &FieldValidator| {
            validator.validate();
        };
        state.listeners.push(surface.add_listener(
            control,
            FieldEvent::Input,
            self.listener(evaluate),
        ));
        if inner.config.validate_on_blur {
            state.listeners.push(surface.add_listener(
                control,
                FieldEvent::Blur,
                self.listener(evaluate),
            ));
        }
        state.listeners.push(surface.add_listener(
            control,
            FieldEvent::KeyUp,
            self.listener(FieldValidator::on_key_up),
        ));

        let rewire = state.companion.is_some()
            && state.companion_subscription.is_none()
            && inner.runtime.is_some();
        let probe = state.companion.is_none()
            && surface.tag_name(control).as_deref() == Some(ENHANCED_TAG);
        debug!("{} listeners bound to {}", state.listeners.len(), control);
        drop(state);

        if rewire {
            self.init_companion();
        }
        if probe {
            self.schedule_companion_probe();
        }
    }

    /// Unbind every listener and drop any pending live evaluation.
    pub fn remove_listeners(&self) {
        let inner = &self.inner;
        let (listeners, subscription) = {
            let mut state = inner.state.lock();
            (
                std::mem::take(&mut state.listeners),
                state.companion_subscription.take(),
            )
        };

        for listener in &listeners {
            inner.surface.remove_listener(*listener);
        }
        if let (Some(subscription), Some(runtime)) = (subscription, &inner.runtime) {
            runtime.unsubscribe(subscription);
        }
        inner.live.cancel();
        inner.probe.cancel();

        debug!("{} listeners removed from {}", listeners.len(), inner.control);
    }

    pub fn is_listening(&self) -> bool {
        !self.inner.state.lock().listeners.is_empty()
    }

    /// Whether a live evaluation is waiting on the throttle delay.
    pub fn has_pending_evaluation(&self) -> bool {
        self.inner.live.is_pending()
    }

    fn on_key_up(&self) {
        let inner = &self.inner;
        if !inner.config.validate_live {
            return;
        }

        let weak: Weak<Inner> = Arc::downgrade(inner);
        let delay = inner.config.throttle_duration();
        let scheduled = inner.live.schedule(delay, move || {
            if let Some(inner) = weak.upgrade() {
                FieldValidator { inner }.validate();
            }
        });
        if scheduled {
            trace!("Live evaluation of {} in {:?}", inner.control, delay);
        }
    }

    fn listener(&self, action: fn(&FieldValidator)) -> Listener {
        let weak = Arc::downgrade(&self.inner);
        Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                action(&FieldValidator { inner });
            }
        })
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("control", &self.inner.control)
            .field("state", &self.state())
            .finish()
    }
}

impl PartialEq for FieldValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
