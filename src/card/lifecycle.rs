use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::card::coordinator::RenderCoordinator;
use crate::card::interaction::InteractionTracker;
use crate::card::services::{CardRenderer, CommandService};
use crate::io::{FilterStore, KeyValueStore};
use crate::model::CardConfig;

/// Everything the host needs to wire one card instance together.
pub struct CardDeps {
    pub store: Box<dyn KeyValueStore>,
    pub renderer: Rc<dyn CardRenderer>,
    pub commands: Rc<dyn CommandService>,
    pub config: CardConfig,
}

/// The collaborator bundle owned by one live card instance. Cheap to clone;
/// all members are shared handles.
#[derive(Clone)]
pub struct CardServices {
    pub filters: Rc<RefCell<FilterStore>>,
    pub commands: Rc<dyn CommandService>,
    pub tracker: Rc<InteractionTracker>,
    pub coordinator: Rc<RefCell<RenderCoordinator>>,
}

struct Inner {
    services: Option<CardServices>,
}

// At most one card instance is live per thread. The host may reconstruct
// the widget without ever destroying the old one, so installation of a new
// instance is what tears the previous one down.
thread_local! {
    static CURRENT: RefCell<Option<Rc<RefCell<Inner>>>> = const { RefCell::new(None) };
}

/// Owns one card instance's collaborators and the one-active-instance
/// discipline.
///
/// Constructing a `Lifecycle` displaces whatever instance was current,
/// running its cleanup first. [`initialize`] builds the collaborator bundle
/// exactly once; [`cleanup`] tears it down deterministically and is safe to
/// call any number of times.
///
/// [`initialize`]: Lifecycle::initialize
/// [`cleanup`]: Lifecycle::cleanup
pub struct Lifecycle {
    inner: Rc<RefCell<Inner>>,
}

impl Lifecycle {
    /// Install a new current instance, cleaning up any displaced one.
    pub fn new() -> Self {
        let inner = Rc::new(RefCell::new(Inner { services: None }));
        CURRENT.with(|current| {
            if let Some(previous) = current.borrow_mut().replace(Rc::clone(&inner)) {
                log::debug!("displacing previous card instance");
                cleanup_inner(&previous);
            }
        });
        Lifecycle { inner }
    }

    /// Construct the collaborator bundle, or return the existing one — a
    /// second call while initialized is a no-op that ignores `deps`.
    pub fn initialize(&self, deps: CardDeps) -> CardServices {
        let existing = self.inner.borrow().services.clone();
        if let Some(services) = existing {
            return services;
        }

        let filters = Rc::new(RefCell::new(FilterStore::new(
            deps.store,
            deps.config.default_sort_method.clone(),
        )));
        let tracker = Rc::new(InteractionTracker::new(Duration::from_millis(
            deps.config.blur_settle_ms,
        )));
        let coordinator = Rc::new(RefCell::new(RenderCoordinator::new(
            Rc::clone(&filters),
            deps.renderer,
            Rc::clone(&tracker),
            &deps.config,
        )));
        let services = CardServices {
            filters,
            commands: deps.commands,
            tracker,
            coordinator,
        };
        self.inner.borrow_mut().services = Some(services.clone());
        services
    }

    /// The live bundle, if initialized and not torn down.
    pub fn services(&self) -> Option<CardServices> {
        self.inner.borrow().services.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.borrow().services.is_some()
    }

    /// Whether this instance is the one the registry considers current.
    pub fn is_current(&self) -> bool {
        CURRENT.with(|current| {
            matches!(&*current.borrow(), Some(cur) if Rc::ptr_eq(cur, &self.inner))
        })
    }

    /// Tear down the bundle (cancelling timers, dropping focus state) and
    /// vacate the registry slot if this instance holds it. Idempotent.
    pub fn cleanup(&self) {
        cleanup_inner(&self.inner);
        CURRENT.with(|current| {
            let mut current = current.borrow_mut();
            if matches!(&*current, Some(cur) if Rc::ptr_eq(cur, &self.inner)) {
                *current = None;
            }
        });
    }
}

fn cleanup_inner(inner: &Rc<RefCell<Inner>>) {
    if let Some(services) = inner.borrow_mut().services.take() {
        services.coordinator.borrow_mut().cleanup();
        services.tracker.reset();
    }
}
