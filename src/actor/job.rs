//! Polling asynchronous jobs to completion.
//!
//! Deletes of organizations, spaces, applications and routes return a job
//! the server works through in the background. [`JobPoller`] re-fetches the
//! job until it finishes, fails, or the configured budget runs out.

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::{ActionReply, ActionResult};
use crate::cloud_controller::{Job, JobClient, JobStatus};
use crate::config::PollingSettings;
use crate::error::ActionError;
use crate::warnings::{Warned, Warnings};

/// Drives asynchronous jobs to a terminal state.
pub struct JobPoller<C: ?Sized> {
    client: Arc<C>,
    settings: Arc<dyn PollingSettings + Send + Sync>,
}

impl<C: ?Sized> Clone for JobPoller<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<C: JobClient + ?Sized> JobPoller<C> {
    /// Creates a poller over `client`, paced by `settings`.
    pub fn new(client: Arc<C>, settings: Arc<dyn PollingSettings + Send + Sync>) -> Self {
        Self { client, settings }
    }

    /// Polls `job` until it finishes.
    ///
    /// The job's own status is ignored; it is fetched afresh on every
    /// iteration. Fetch warnings are kept even when the fetch fails, and a
    /// fetch error is returned as soon as it happens.
    ///
    /// # Errors
    ///
    /// - [`ActionError::JobFailed`] when the job reaches the failed state.
    /// - [`ActionError::JobTimeout`] when the polling budget is spent while
    ///   the job is still queued or running. The budget is checked before
    ///   each sleep, so no fetch happens after it runs out.
    /// - [`ActionError::Generic`] for any error fetching the job.
    pub async fn poll_job(&self, job: &Job) -> ActionReply<()> {
        let mut warnings = Warnings::new();
        let result = self.poll_until_terminal(&job.guid, &mut warnings).await;
        Warned::new(result, warnings)
    }

    /// Blocking form of [`JobPoller::poll_job`] for callers outside the
    /// runtime.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context, as
    /// [`Handle::block_on`] does.
    pub fn poll_job_blocking(&self, handle: &Handle, job: &Job) -> ActionReply<()> {
        handle.block_on(self.poll_job(job))
    }

    async fn poll_until_terminal(
        &self,
        job_guid: &str,
        warnings: &mut Warnings,
    ) -> ActionResult<()> {
        let interval = self.settings.polling_interval();
        let timeout = self.settings.job_polling_timeout();
        let started = Instant::now();

        loop {
            let current = warnings.absorb(self.client.get_job(job_guid).await)?;
            debug!(job_guid, status = %current.status, "polled job");

            match current.status {
                JobStatus::Finished => return Ok(()),
                JobStatus::Failed => {
                    let message = current.error_message.unwrap_or_default();
                    warn!(job_guid, %message, "job failed");
                    return Err(ActionError::JobFailed {
                        job_guid: job_guid.to_owned(),
                        message,
                    });
                }
                JobStatus::Queued | JobStatus::Running => {}
            }

            if started.elapsed() >= timeout {
                warn!(job_guid, timeout_secs = timeout.as_secs(), "job polling timed out");
                return Err(ActionError::JobTimeout {
                    job_guid: job_guid.to_owned(),
                    timeout,
                });
            }

            tokio::time::sleep(interval).await;
        }
    }
}
