// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Backoff, Condition, WaitContext};
use crate::error::Result;
use crate::provider::StateProvider;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Polls a provider until conditions hold.
///
/// Conditions are handled one after the other, in order. A condition that
/// already holds costs no fetch. Otherwise its object is fetched, the
/// condition re-checked, and this repeats (with `backoff` between fetches)
/// until it holds, a fetch fails or the context ends. Earlier conditions are
/// not re-checked once a later one is being waited for.
pub struct Waiter<'p, P> {
    provider: &'p P,
    backoff: Backoff,
}

impl<'p, P: StateProvider> Waiter<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            backoff: Backoff::default(),
        }
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Block until every condition held, in sequence.
    ///
    /// Fails with the first fetch error, or with `DeadlineExceeded` /
    /// `Cancelled` naming the condition that was pending at the time.
    #[instrument(skip_all, fields(conditions = conditions.len()))]
    pub async fn wait_until(
        &self,
        ctx: &WaitContext,
        conditions: &mut [&mut dyn Condition<P>],
    ) -> Result<()> {
        for condition in conditions.iter_mut() {
            self.wait_for(ctx, &mut **condition).await?;
        }
        Ok(())
    }

    async fn wait_for<'c>(
        &self,
        ctx: &WaitContext,
        condition: &mut (dyn Condition<P> + 'c),
    ) -> Result<()> {
        let mut fetches: u32 = 0;

        while !condition.evaluate() {
            if let Some(interrupt) = ctx.interrupted() {
                return Err(interrupt.into_error(condition.describe()));
            }

            if fetches > 0 {
                let delay = self.backoff.delay(fetches);
                if delay.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::select! {
                        biased;
                        interrupt = ctx.done() => {
                            return Err(interrupt.into_error(condition.describe()));
                        }
                        _ = sleep(delay) => {}
                    }
                }
            }

            let outcome = tokio::select! {
                biased;
                interrupt = ctx.done() => Err(interrupt),
                result = condition.refresh(self.provider) => Ok(result),
            };
            match outcome {
                Ok(result) => result?,
                Err(interrupt) => return Err(interrupt.into_error(condition.describe())),
            }

            fetches += 1;
            debug!(condition = %condition.describe(), fetches, "Refreshed condition target");
        }

        if fetches > 0 {
            info!("Condition met: {} after {} fetches", condition.describe(), fetches);
        }
        Ok(())
    }
}
