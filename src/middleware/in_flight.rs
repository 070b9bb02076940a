use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Disable-while-pending flag shared by clones of a service. At most one
/// submission holds the ticket; the flag is released when the ticket drops,
/// including on early return through `?`.
#[derive(Clone, Debug, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct InFlightTicket {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Result<InFlightTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                tracing::warn!("Duplicate submission rejected while a request is pending");
                Error::Busy
            })?;
        Ok(InFlightTicket {
            busy: self.busy.clone(),
        })
    }

    pub fn is_pending(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
