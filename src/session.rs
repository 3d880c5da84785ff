// src/session.rs

//! Event loop glue.
//!
//! A `Session` owns the `App` and turns `Effect::Schedule` into one-shot
//! timers. Fired timers send their command into a channel whose receiver
//! belongs to the host, so host input and deferred commands are handled
//! one at a time on the same task.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::catalog::{Catalog, CatalogLoader, CatalogSource};
use crate::error::Result;
use crate::interaction::{App, Command, Effect};

pub struct Session {
    app: App,
    deferred: mpsc::UnboundedSender<Command>,
}

impl Session {
    /// Create a session and the receiver for its deferred commands.
    pub fn new(app: App) -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (deferred, rx) = mpsc::unbounded_channel();
        (Self { app, deferred }, rx)
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub async fn initialize(
        &mut self,
        loader: &CatalogLoader,
        source: &CatalogSource,
    ) -> Result<Vec<Effect>> {
        let effects = self.app.initialize(loader, source).await?;
        Ok(self.schedule(effects))
    }

    pub async fn install(&mut self, catalog: Catalog) -> Vec<Effect> {
        let effects = self.app.install(catalog).await;
        self.schedule(effects)
    }

    /// Dispatch a command. Returned effects never include `Schedule`.
    pub async fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        let effects = self.app.dispatch(command).await;
        self.schedule(effects)
    }

    fn schedule(&self, effects: Vec<Effect>) -> Vec<Effect> {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Schedule { after, command } => {
                    self.defer(after, command);
                    None
                }
                other => Some(other),
            })
            .collect()
    }

    fn defer(&self, after: Duration, command: Command) {
        let tx = self.deferred.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if tx.send(command).is_err() {
                log::debug!("Session closed before deferred command fired");
            }
        });
    }
}
