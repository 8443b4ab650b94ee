//! Scoped ownership of heavyweight acquisition resources (browser
//! automation sessions and the like).

use async_trait::async_trait;
use opinion_core::{DataSource, OpinionResult, RawRecord};
use std::marker::PhantomData;

/// A resource that must be explicitly shut down
pub trait AutomationSession: Send {
    fn release(&mut self);
}

/// Acquires a session on first use and releases it exactly once when
/// dropped, whichever way the owning scope exits.
pub struct ScopedSession<S, F>
where
    S: AutomationSession,
    F: FnMut() -> OpinionResult<S>,
{
    factory: F,
    session: Option<S>,
}

impl<S, F> ScopedSession<S, F>
where
    S: AutomationSession,
    F: FnMut() -> OpinionResult<S>,
{
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            session: None,
        }
    }

    /// The live session, starting it if needed
    pub fn get(&mut self) -> OpinionResult<&mut S> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                let session = (self.factory)()?;
                tracing::debug!("automation session started");
                session
            }
        };
        Ok(self.session.insert(session))
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Release early. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
            tracing::debug!("automation session released");
        }
    }
}

impl<S, F> Drop for ScopedSession<S, F>
where
    S: AutomationSession,
    F: FnMut() -> OpinionResult<S>,
{
    fn drop(&mut self) {
        self.release();
    }
}

/// [`DataSource`] that runs a crawl routine against a scoped session.
///
/// A fresh session is started for every crawl and released before `crawl`
/// returns, on success and on error.
pub struct SessionSource<S, F, C>
where
    S: AutomationSession,
    F: FnMut() -> OpinionResult<S> + Send,
    C: FnMut(&mut S) -> OpinionResult<Vec<RawRecord>> + Send,
{
    name: String,
    factory: F,
    routine: C,
    _session: PhantomData<fn() -> S>,
}

impl<S, F, C> SessionSource<S, F, C>
where
    S: AutomationSession,
    F: FnMut() -> OpinionResult<S> + Send,
    C: FnMut(&mut S) -> OpinionResult<Vec<RawRecord>> + Send,
{
    pub fn new(name: impl Into<String>, factory: F, routine: C) -> Self {
        Self {
            name: name.into(),
            factory,
            routine,
            _session: PhantomData,
        }
    }
}

#[async_trait]
impl<S, F, C> DataSource for SessionSource<S, F, C>
where
    S: AutomationSession,
    F: FnMut() -> OpinionResult<S> + Send,
    C: FnMut(&mut S) -> OpinionResult<Vec<RawRecord>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn crawl(&mut self) -> OpinionResult<Vec<RawRecord>> {
        let mut session = ScopedSession::new(&mut self.factory);
        let browser = session.get()?;
        (self.routine)(browser)
    }
}
