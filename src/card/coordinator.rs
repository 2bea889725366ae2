use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::card::changes::ChangeDetector;
use crate::card::interaction::InteractionTracker;
use crate::card::services::CardRenderer;
use crate::card::CardError;
use crate::io::FilterStore;
use crate::model::{validate_inventory_items, CardConfig, Item};
use crate::ops::{filter_items_on, sort_items_with_label};

/// What the user sees when a render blows up. Fixed text: raw error strings
/// could carry markup from upstream data.
const RENDER_FAILURE_MESSAGE: &str = "Unable to update the inventory view.";

/// Orchestrates when and how the card re-renders.
///
/// Upstream pushes go through the change gate first; real changes render
/// immediately unless the user is mid-edit, in which case a single
/// coalescing debounce timer is (re)armed. Saves arm a separate, shorter
/// refresh timer. Both timers are plain deadlines polled by the host's
/// `tick()` — rearming always supersedes the pending deadline of the same
/// kind, and at most one of each exists per coordinator.
pub struct RenderCoordinator {
    filters: Rc<RefCell<FilterStore>>,
    renderer: Rc<dyn CardRenderer>,
    tracker: Rc<InteractionTracker>,
    changes: ChangeDetector,
    uncategorized_label: String,
    debounce: Duration,
    refresh_delay: Duration,
    current: Option<CurrentEntity>,
    has_rendered: bool,
    debounce_deadline: Option<Instant>,
    refresh_deadline: Option<Instant>,
}

/// Latest validated upstream state, re-rendered on demand.
struct CurrentEntity {
    entity_id: String,
    items: Vec<Item>,
}

impl RenderCoordinator {
    pub fn new(
        filters: Rc<RefCell<FilterStore>>,
        renderer: Rc<dyn CardRenderer>,
        tracker: Rc<InteractionTracker>,
        config: &CardConfig,
    ) -> Self {
        RenderCoordinator {
            filters,
            renderer,
            tracker,
            changes: ChangeDetector::new(),
            uncategorized_label: config.uncategorized_label.clone(),
            debounce: Duration::from_millis(config.debounce_ms),
            refresh_delay: Duration::from_millis(config.refresh_after_save_ms),
            current: None,
            has_rendered: false,
            debounce_deadline: None,
            refresh_deadline: None,
        }
    }

    /// Feed one upstream state push through the change gate.
    ///
    /// The raw list is validated at this boundary; the change detector and
    /// all later rendering only ever see closed [`Item`] records. The very
    /// first push renders unconditionally (there is no baseline to compare
    /// against yet, but this push establishes one).
    pub fn on_upstream_push(&mut self, entity_id: &str, raw_items: Option<&[Value]>) {
        let items = raw_items.map(validate_inventory_items);
        let changed = self.changes.has_real_change(entity_id, items.as_deref());
        if let Some(items) = items {
            self.current = Some(CurrentEntity {
                entity_id: entity_id.to_string(),
                items,
            });
        }

        if !self.has_rendered {
            self.has_rendered = true;
            self.render();
            return;
        }
        if !changed {
            return;
        }
        if self.tracker.is_interacting() {
            // Supersedes any pending debounce; bursts coalesce into one render
            self.debounce_deadline = Some(Instant::now() + self.debounce);
        } else {
            self.render();
        }
    }

    /// Schedule the single post-save refresh. Independent of the debounce
    /// path; both may be in flight and either may fire first.
    pub fn after_save(&mut self) {
        self.refresh_deadline = Some(Instant::now() + self.refresh_delay);
    }

    /// Fire any due timer. The host calls this from its event loop; a tick
    /// where both timers are due performs one render (rendering is
    /// idempotent against the same inputs).
    pub fn tick(&mut self) {
        let now = Instant::now();
        let mut due = false;
        if self.debounce_deadline.is_some_and(|at| now >= at) {
            self.debounce_deadline = None;
            due = true;
        }
        if self.refresh_deadline.is_some_and(|at| now >= at) {
            self.refresh_deadline = None;
            due = true;
        }
        if due {
            self.render();
        }
    }

    /// Render the current state: resolve filters, filter, sort, hand off.
    /// Failures are contained here — logged and shown as a generic error
    /// panel, never propagated to the host runtime.
    pub fn render(&self) {
        if let Err(e) = self.try_render() {
            log::error!("card render failed: {e}");
            self.renderer.render_error(RENDER_FAILURE_MESSAGE);
        }
    }

    fn try_render(&self) -> Result<(), CardError> {
        let Some(current) = &self.current else {
            // Nothing pushed yet; nothing to draw
            return Ok(());
        };
        let filters = self.filters.borrow().get(&current.entity_id);
        let today = chrono::Local::now().date_naive();
        let filtered = filter_items_on(&current.items, Some(&filters), today);
        let sorted =
            sort_items_with_label(&filtered, &filters.sort_method, &self.uncategorized_label);
        self.renderer
            .render_card(&current.entity_id, &sorted, &filters)
    }

    /// True while a coalescing render is scheduled.
    pub fn debounce_pending(&self) -> bool {
        self.debounce_deadline.is_some()
    }

    /// True while a post-save refresh is scheduled.
    pub fn refresh_pending(&self) -> bool {
        self.refresh_deadline.is_some()
    }

    /// Cancel any scheduled render. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        self.debounce_deadline = None;
        self.refresh_deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;
    use crate::model::FilterState;
    use serde_json::json;
    use std::cell::Cell;
    use std::thread::sleep;

    /// Renderer double that records every call.
    #[derive(Default)]
    struct RecordingRenderer {
        cards: RefCell<Vec<(String, Vec<Item>, FilterState)>>,
        errors: RefCell<Vec<String>>,
        fail: Cell<bool>,
    }

    impl CardRenderer for RecordingRenderer {
        fn render_card(
            &self,
            entity_id: &str,
            items: &[Item],
            filters: &FilterState,
        ) -> Result<(), CardError> {
            if self.fail.get() {
                return Err(CardError::Render("boom <script>".into()));
            }
            self.cards
                .borrow_mut()
                .push((entity_id.to_string(), items.to_vec(), filters.clone()));
            Ok(())
        }

        fn render_error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }

    struct Fixture {
        renderer: Rc<RecordingRenderer>,
        tracker: Rc<InteractionTracker>,
        filters: Rc<RefCell<FilterStore>>,
        coordinator: RenderCoordinator,
    }

    fn fixture() -> Fixture {
        fixture_with(CardConfig {
            debounce_ms: 80,
            refresh_after_save_ms: 20,
            blur_settle_ms: 30,
            ..Default::default()
        })
    }

    fn fixture_with(config: CardConfig) -> Fixture {
        let renderer = Rc::new(RecordingRenderer::default());
        let tracker = Rc::new(InteractionTracker::new(Duration::from_millis(
            config.blur_settle_ms,
        )));
        let filters = Rc::new(RefCell::new(FilterStore::new(
            Box::new(MemoryStore::new()),
            config.default_sort_method.clone(),
        )));
        let coordinator = RenderCoordinator::new(
            Rc::clone(&filters),
            Rc::clone(&renderer) as Rc<dyn CardRenderer>,
            Rc::clone(&tracker),
            &config,
        );
        Fixture {
            renderer,
            tracker,
            filters,
            coordinator,
        }
    }

    fn raw_items(names: &[&str]) -> Vec<Value> {
        names
            .iter()
            .map(|n| json!({"name": n, "quantity": 1.0}))
            .collect()
    }

    fn render_count(f: &Fixture) -> usize {
        f.renderer.cards.borrow().len()
    }

    // --- First push ---

    #[test]
    fn first_push_always_renders() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        assert_eq!(render_count(&f), 1);
        let cards = f.renderer.cards.borrow();
        assert_eq!(cards[0].0, "sensor.kitchen");
        assert_eq!(cards[0].1[0].name, "Milk");
    }

    #[test]
    fn first_push_renders_even_while_interacting() {
        let mut f = fixture();
        f.tracker.focus_gained();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        assert_eq!(render_count(&f), 1);
        assert!(!f.coordinator.debounce_pending());
    }

    // --- Change gate ---

    #[test]
    fn identical_push_does_not_rerender() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        assert_eq!(render_count(&f), 1);
    }

    #[test]
    fn changed_push_rerenders_synchronously_when_not_interacting() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk", "Bread"])));
        assert_eq!(render_count(&f), 2);
    }

    // --- Debounce path ---

    #[test]
    fn pushes_while_interacting_coalesce_into_one_render() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        f.tracker.focus_gained();

        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk", "Bread"])));
        sleep(Duration::from_millis(10));
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk", "Bread", "Eggs"])));
        assert_eq!(render_count(&f), 1);
        assert!(f.coordinator.debounce_pending());

        // The first deadline was superseded: well within the window after
        // the last push, the timer must not have fired yet
        sleep(Duration::from_millis(30));
        f.coordinator.tick();
        assert_eq!(render_count(&f), 1);

        sleep(Duration::from_millis(70));
        f.coordinator.tick();
        assert_eq!(render_count(&f), 2);
        assert!(!f.coordinator.debounce_pending());
        // The render shows the latest pushed state
        assert_eq!(f.renderer.cards.borrow()[1].1.len(), 3);
    }

    #[test]
    fn debounced_render_fires_once_not_per_push() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["A"])));
        f.tracker.focus_gained();
        for n in 0..5 {
            f.coordinator.on_upstream_push(
                "sensor.kitchen",
                Some(&raw_items(&["A", &format!("Extra {n}")])),
            );
        }
        sleep(Duration::from_millis(100));
        f.coordinator.tick();
        f.coordinator.tick();
        assert_eq!(render_count(&f), 2);
    }

    // --- Refresh-after-save path ---

    #[test]
    fn after_save_renders_once_after_the_delay() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        f.coordinator.after_save();
        assert!(f.coordinator.refresh_pending());
        f.coordinator.tick();
        assert_eq!(render_count(&f), 1);

        sleep(Duration::from_millis(30));
        f.coordinator.tick();
        assert_eq!(render_count(&f), 2);
        assert!(!f.coordinator.refresh_pending());
    }

    #[test]
    fn refresh_does_not_cancel_a_pending_debounce() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        f.tracker.focus_gained();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk", "Bread"])));
        f.coordinator.after_save();
        assert!(f.coordinator.debounce_pending());
        assert!(f.coordinator.refresh_pending());

        sleep(Duration::from_millis(100));
        f.coordinator.tick();
        // Both were due in one tick: one render, both cleared
        assert_eq!(render_count(&f), 2);
        assert!(!f.coordinator.debounce_pending());
        assert!(!f.coordinator.refresh_pending());
    }

    // --- Filtering and sorting flow through render ---

    #[test]
    fn render_applies_stored_filters_and_sort() {
        let mut f = fixture();
        f.filters
            .borrow_mut()
            .save(
                "sensor.kitchen",
                &FilterState {
                    quantity: vec!["nonzero".into()],
                    sort_method: "name".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        let raw = vec![
            json!({"name": "Item 10", "quantity": 2.0}),
            json!({"name": "Item 2", "quantity": 1.0}),
            json!({"name": "Empty", "quantity": 0.0}),
        ];
        f.coordinator.on_upstream_push("sensor.kitchen", Some(&raw));
        let cards = f.renderer.cards.borrow();
        let names: Vec<_> = cards[0].1.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Item 2", "Item 10"]);
        assert_eq!(cards[0].2.sort_method, "name");
    }

    #[test]
    fn malformed_entries_are_dropped_before_render() {
        let mut f = fixture();
        let raw = vec![json!({"quantity": 2.0}), json!({"name": "Bread"})];
        f.coordinator.on_upstream_push("sensor.kitchen", Some(&raw));
        let cards = f.renderer.cards.borrow();
        assert_eq!(cards[0].1.len(), 1);
        assert_eq!(cards[0].1[0].name, "Bread");
    }

    // --- Failure containment ---

    #[test]
    fn renderer_failure_becomes_a_sanitized_error_panel() {
        let mut f = fixture();
        f.renderer.fail.set(true);
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        let errors = f.renderer.errors.borrow();
        assert_eq!(errors.len(), 1);
        // Fixed message, no raw error text
        assert_eq!(errors[0], RENDER_FAILURE_MESSAGE);
        assert!(!errors[0].contains("script"));
    }

    #[test]
    fn render_before_any_push_is_a_quiet_no_op() {
        let f = fixture();
        f.coordinator.render();
        assert_eq!(render_count(&f), 0);
        assert!(f.renderer.errors.borrow().is_empty());
    }

    // --- Cleanup ---

    #[test]
    fn cleanup_cancels_pending_timers_and_is_idempotent() {
        let mut f = fixture();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk"])));
        f.tracker.focus_gained();
        f.coordinator
            .on_upstream_push("sensor.kitchen", Some(&raw_items(&["Milk", "Bread"])));
        f.coordinator.after_save();
        f.coordinator.cleanup();
        f.coordinator.cleanup();
        assert!(!f.coordinator.debounce_pending());
        assert!(!f.coordinator.refresh_pending());

        sleep(Duration::from_millis(60));
        f.coordinator.tick();
        assert_eq!(render_count(&f), 1);
    }
}
