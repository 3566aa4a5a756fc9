use tracing::{debug, error, warn};

use crate::error::LockerError;
use crate::proximity::DragSession;
use crate::registry::BoxCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Swapped { from: usize, to: usize },
    Unchanged,
    /// The release arrived without a drag in progress.
    Degenerate,
}

/// Commits or discards the gesture on release. The session is always left idle.
pub fn finish_drag(session: &mut DragSession, collection: &mut BoxCollection) -> DragOutcome {
    if !session.is_dragging() {
        warn!("{}", LockerError::DegenerateDrag);
        session.take();
        return DragOutcome::Degenerate;
    }

    let (Some(from), Some(to)) = session.take() else {
        debug!("drag released without an exchange candidate");
        return DragOutcome::Unchanged;
    };
    // the tracker never offers the dragged slot, but a self swap must stay a no-op
    if from == to {
        return DragOutcome::Unchanged;
    }

    match collection.swap(from, to) {
        Ok(()) => {
            debug!(from, to, "swapped boxes");
            DragOutcome::Swapped { from, to }
        }
        Err(err) => {
            error!("Could not commit drag: {err}");
            DragOutcome::Unchanged
        }
    }
}

/// The host aborted the gesture: behaves like a release without a candidate.
pub fn cancel_drag(session: &mut DragSession) -> DragOutcome {
    let was_dragging = session.is_dragging();
    session.take();
    if was_dragging {
        debug!("drag canceled");
        DragOutcome::Unchanged
    } else {
        DragOutcome::Degenerate
    }
}
