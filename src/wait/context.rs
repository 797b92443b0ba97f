// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deadline and cancellation carried through a wait.

use crate::error::TestutilError;
use futures::future;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Why a wait was interrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineExceeded,
}

impl Interrupt {
    pub fn into_error(self, target: impl Into<String>) -> TestutilError {
        match self {
            Interrupt::Cancelled => TestutilError::Cancelled(target.into()),
            Interrupt::DeadlineExceeded => TestutilError::DeadlineExceeded(target.into()),
        }
    }
}

/// An optional deadline plus an optional cancellation token.
///
/// Cancellation wins over the deadline when both have fired.
#[derive(Debug, Clone, Default)]
pub struct WaitContext {
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
}

impl WaitContext {
    /// A context that never ends on its own
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            token: None,
        }
    }

    /// Attach a cancellation token; cancelling it stops every wait using this context
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Non-blocking check of the current state
    pub fn interrupted(&self) -> Option<Interrupt> {
        if self.token.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Some(Interrupt::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(Interrupt::DeadlineExceeded);
        }
        None
    }

    /// Resolves once the context is cancelled or its deadline passes
    pub async fn done(&self) -> Interrupt {
        let cancelled = async {
            match &self.token {
                Some(token) => token.cancelled().await,
                None => future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Interrupt::Cancelled,
            _ = expired => Interrupt::DeadlineExceeded,
        }
    }
}
