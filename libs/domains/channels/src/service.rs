use observability::RouterMetrics;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::error::ChannelResult;
use crate::models::Channel;
use crate::repository::MembershipRepository;

/// Channel resolution over a [`MembershipRepository`].
pub struct ChannelService<R: MembershipRepository> {
    repository: Arc<R>,
}

impl<R: MembershipRepository> ChannelService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Channel for `account` on `module`.
    ///
    /// A failed lookup never fails the request: it is logged with
    /// `fail_open = true`, counted, and answered with [`Channel::Release`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, module: &str, account: &str) -> Channel {
        match self.repository.count(module, account).await {
            Ok(count) if count > 0 => Channel::Testing,
            Ok(_) => Channel::Release,
            Err(e) => {
                warn!(
                    fail_open = true,
                    module,
                    account,
                    error = %e,
                    "Membership lookup failed, serving release channel"
                );
                RouterMetrics::record_channel_fail_open();
                Channel::Release
            }
        }
    }

    /// Opt `account` into the testing channel for `module`.
    #[instrument(skip(self))]
    pub async fn enroll(&self, module: &str, account: &str) -> ChannelResult<()> {
        self.repository.insert_membership(module, account).await
    }
}
