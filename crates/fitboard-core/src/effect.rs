//! Asynchronous reads requested by the views
//!
//! Views never perform I/O. They queue an [`Effect`] and the host runs it
//! however it likes, then reports the outcome back through the dashboard
//! together with the effect's [`Ticket`]. Each kind of read has a
//! generation counter; a completion carrying anything but the latest ticket
//! answers a question nobody is asking any more and is dropped.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;

use fitboard_io::DatasetMeta;

use crate::service::ModelRequest;

/// Generation token of one issued read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A read the host should perform
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read and parse the dataset's CSV resource
    LoadDataset { ticket: Ticket, dataset: DatasetMeta },
    /// Issue a fit request to the modeling service
    FitModel { ticket: Ticket, request: ModelRequest },
}

impl Effect {
    pub fn ticket(&self) -> Ticket {
        match self {
            Effect::LoadDataset { ticket, .. } | Effect::FitModel { ticket, .. } => *ticket,
        }
    }
}

/// Pending effects plus the current generation of each read kind
#[derive(Debug, Default)]
pub struct Effects {
    queue: RefCell<VecDeque<Effect>>,
    dataset: Cell<u64>,
    model: Cell<u64>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a dataset load, superseding any load still in flight
    pub fn load_dataset(&self, dataset: DatasetMeta) -> Ticket {
        let ticket = advance(&self.dataset);
        self.queue
            .borrow_mut()
            .push_back(Effect::LoadDataset { ticket, dataset });
        ticket
    }

    /// Mark every load in flight as stale without queueing a new one
    pub fn invalidate_dataset(&self) -> Ticket {
        advance(&self.dataset)
    }

    /// Mark every fit in flight as stale; returns the new generation
    pub fn invalidate_model(&self) -> Ticket {
        advance(&self.model)
    }

    /// Queue a fit under the current model generation
    pub fn fit_model(&self, request: ModelRequest) -> Ticket {
        let ticket = Ticket(self.model.get());
        self.queue
            .borrow_mut()
            .push_back(Effect::FitModel { ticket, request });
        ticket
    }

    pub fn is_current_dataset(&self, ticket: Ticket) -> bool {
        ticket.0 == self.dataset.get()
    }

    pub fn is_current_model(&self, ticket: Ticket) -> bool {
        ticket.0 == self.model.get()
    }

    /// Take every queued effect, oldest first
    pub fn drain(&self) -> Vec<Effect> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

fn advance(counter: &Cell<u64>) -> Ticket {
    let next = counter.get() + 1;
    counter.set(next);
    Ticket(next)
}
