use log::trace;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{SessionCommand, SessionEvent, SessionStatus};

/// Turns `CountdownChanged` into a `CountdownTick` command one interval later.
/// At most one tick is pending; a new session or a status change drops it.
pub struct CountdownDriver {
    commands: EventEmitter<SessionCommand>,
    interval: Duration,
    generation: Rc<Cell<u64>>,
    subscription: Option<Unsubscriber<SessionEvent>>,
}

impl Destroyable for CountdownDriver {
    fn destroy(&mut self) {
        self.cancel();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl CountdownDriver {
    pub fn new(
        event_observer: EventObserver<SessionEvent>,
        commands: EventEmitter<SessionCommand>,
        interval: Duration,
    ) -> Rc<RefCell<Self>> {
        let driver = Rc::new(RefCell::new(Self {
            commands,
            interval,
            generation: Rc::new(Cell::new(0)),
            subscription: None,
        }));
        Self::wire_subscription(driver.clone(), event_observer);
        driver
    }

    fn wire_subscription(driver: Rc<RefCell<Self>>, event_observer: EventObserver<SessionEvent>) {
        let handler = driver.clone();
        let subscription = event_observer.subscribe(move |event| {
            handler.borrow_mut().handle_event(event);
        });
        driver.borrow_mut().subscription = Some(subscription);
    }

    fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    fn schedule(&self) {
        self.cancel();
        let generation = Rc::clone(&self.generation);
        let scheduled = generation.get();
        let commands = self.commands.clone();
        let interval = self.interval;
        glib::MainContext::ref_thread_default().spawn_local(async move {
            glib::timeout_future(interval).await;
            if generation.get() == scheduled {
                commands.emit(SessionCommand::CountdownTick);
            } else {
                trace!(target: "countdown", "Dropping stale tick {}", scheduled);
            }
        });
    }
}

impl EventHandler<SessionEvent> for CountdownDriver {
    fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::CountdownChanged(remaining) if *remaining > 0 => self.schedule(),
            SessionEvent::SequenceDealt { .. } => self.cancel(),
            SessionEvent::StatusChanged(status) if *status != SessionStatus::Countdown => self.cancel(),
            _ => (),
        }
    }
}
