//! View state of the public menu page.
//!
//! The browser script (`static/menu.js`) runs these same transitions; the
//! page renders the initial state and the timing constants into `data-*`
//! attributes so both sides agree. Time is always passed in, never read.
//!
//! The server only uses the initial state. The transitions are the tested
//! reference model that `menu.js` follows.

use std::time::{Duration, Instant};

use qresto_core::{CategoryId, ProductId};

/// How long observer-driven updates are ignored after a pill click.
pub const GUARD_WINDOW: Duration = Duration::from_millis(800);

/// How long the "copied" state of the WiFi password lasts.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// Shown in the overlay for products without a description.
pub const DESCRIPTION_FALLBACK: &str = "Este plato no tiene descripción adicional.";

/// Shown in the WiFi bubble for open networks.
pub const OPEN_NETWORK_LABEL: &str = "Sin clave";

/// Which category pill is highlighted.
///
/// Two inputs move the highlight: a pill click (which also starts a smooth
/// scroll) and the section observer. While a click's guard window is open,
/// the observer is ignored; the guard ends by timeout only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNavigator {
    active: Option<CategoryId>,
    guard_until: Option<Instant>,
}

impl CategoryNavigator {
    /// Start with the first section active.
    #[must_use]
    pub const fn new(first: Option<CategoryId>) -> Self {
        Self {
            active: first,
            guard_until: None,
        }
    }

    /// The highlighted category.
    #[must_use]
    pub const fn active(&self) -> Option<CategoryId> {
        self.active
    }

    /// Whether `id` is the highlighted category.
    #[must_use]
    pub fn is_active(&self, id: CategoryId) -> bool {
        self.active == Some(id)
    }

    /// Whether observer updates are currently suppressed.
    #[must_use]
    pub fn is_guarded(&self, now: Instant) -> bool {
        self.guard_until.is_some_and(|until| now < until)
    }

    /// A pill was clicked: activate it immediately and open the guard.
    pub fn select(&mut self, id: CategoryId, now: Instant) {
        self.active = Some(id);
        self.guard_until = Some(now + GUARD_WINDOW);
    }

    /// The observer reports `id` as the section in view.
    ///
    /// Returns whether the highlight changed.
    pub fn observe(&mut self, id: CategoryId, now: Instant) -> bool {
        if self.is_guarded(now) {
            return false;
        }
        self.guard_until = None;
        if self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }
}

/// The product detail overlay. At most one product is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductOverlay {
    open: Option<ProductId>,
}

impl ProductOverlay {
    /// Open a product, replacing any open one.
    pub fn open(&mut self, id: ProductId) {
        self.open = Some(id);
    }

    /// Close via backdrop or close button.
    pub fn close(&mut self) {
        self.open = None;
    }

    /// The open product.
    #[must_use]
    pub const fn current(&self) -> Option<ProductId> {
        self.open
    }
}

/// The floating WiFi bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiBubble {
    expanded: bool,
    has_password: bool,
    copied_at: Option<Instant>,
}

impl WifiBubble {
    /// A collapsed bubble.
    #[must_use]
    pub const fn new(has_password: bool) -> Self {
        Self {
            expanded: false,
            has_password,
            copied_at: None,
        }
    }

    /// Show or hide the SSID and password.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether the copy action is offered.
    #[must_use]
    pub const fn can_copy(&self) -> bool {
        self.has_password
    }

    /// Copy the password. Returns `false` for open networks.
    pub fn copy(&mut self, now: Instant) -> bool {
        if !self.has_password {
            return false;
        }
        self.copied_at = Some(now);
        true
    }

    /// Whether the "copied" feedback is showing.
    ///
    /// Reverts [`COPY_FEEDBACK`] after the last copy, whatever happens to
    /// the bubble in between.
    #[must_use]
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_FEEDBACK)
    }
}

/// Milliseconds for a `data-*` attribute.
#[must_use]
pub fn as_millis(duration: Duration) -> u128 {
    duration.as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigator_starts_on_first_section() {
        let first = CategoryId::generate();
        let nav = CategoryNavigator::new(Some(first));
        assert!(nav.is_active(first));
        assert!(!nav.is_guarded(Instant::now()));
    }

    #[test]
    fn test_click_activates_immediately_and_guards() {
        let a = CategoryId::generate();
        let b = CategoryId::generate();
        let c = CategoryId::generate();
        let t0 = Instant::now();
        let mut nav = CategoryNavigator::new(Some(a));

        nav.select(c, t0);
        assert_eq!(nav.active(), Some(c));

        // The smooth scroll passes over b while the guard is open.
        assert!(!nav.observe(b, t0 + Duration::from_millis(300)));
        assert_eq!(nav.active(), Some(c));
        assert!(!nav.observe(b, t0 + Duration::from_millis(799)));
        assert_eq!(nav.active(), Some(c));
    }

    #[test]
    fn test_observer_resumes_after_guard_window() {
        let a = CategoryId::generate();
        let b = CategoryId::generate();
        let t0 = Instant::now();
        let mut nav = CategoryNavigator::new(Some(a));

        nav.select(a, t0);
        assert!(nav.observe(b, t0 + GUARD_WINDOW));
        assert_eq!(nav.active(), Some(b));
        assert!(!nav.is_guarded(t0 + GUARD_WINDOW));
    }

    #[test]
    fn test_second_click_extends_guard() {
        let a = CategoryId::generate();
        let b = CategoryId::generate();
        let c = CategoryId::generate();
        let t0 = Instant::now();
        let mut nav = CategoryNavigator::new(Some(a));

        nav.select(b, t0);
        nav.select(c, t0 + Duration::from_millis(500));
        assert!(!nav.observe(a, t0 + Duration::from_millis(1000)));
        assert_eq!(nav.active(), Some(c));
        assert!(nav.observe(a, t0 + Duration::from_millis(1300)));
    }

    #[test]
    fn test_observe_same_section_is_no_change() {
        let a = CategoryId::generate();
        let mut nav = CategoryNavigator::new(Some(a));
        assert!(!nav.observe(a, Instant::now()));
    }

    #[test]
    fn test_overlay_single_selection() {
        let pizza = ProductId::generate();
        let sopa = ProductId::generate();
        let mut overlay = ProductOverlay::default();
        assert_eq!(overlay.current(), None);

        overlay.open(pizza);
        overlay.open(sopa);
        assert_eq!(overlay.current(), Some(sopa));

        overlay.close();
        assert_eq!(overlay.current(), None);
    }

    #[test]
    fn test_wifi_copy_reverts_after_feedback_window() {
        let t0 = Instant::now();
        let mut bubble = WifiBubble::new(true);
        bubble.toggle();
        assert!(bubble.is_expanded());

        assert!(bubble.copy(t0));
        assert!(bubble.is_copied(t0 + Duration::from_millis(1999)));

        // Collapsing the bubble does not reset the timer.
        bubble.toggle();
        assert!(bubble.is_copied(t0 + Duration::from_millis(1500)));
        assert!(!bubble.is_copied(t0 + COPY_FEEDBACK));
    }

    #[test]
    fn test_wifi_open_network_cannot_copy() {
        let mut bubble = WifiBubble::new(false);
        assert!(!bubble.can_copy());
        assert!(!bubble.copy(Instant::now()));
        assert!(!bubble.is_copied(Instant::now()));
    }

    #[test]
    fn test_constants_in_millis() {
        assert_eq!(as_millis(GUARD_WINDOW), 800);
        assert_eq!(as_millis(COPY_FEEDBACK), 2000);
    }
}
