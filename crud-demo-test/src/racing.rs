use crud_demo_data::{CrudDemo, DataError, Gateway, MemoryGateway, MemorySession, Session};

/// Gateway whose sessions always lose a race: a rival writer deletes every
/// row right before the session's own commit lands.
#[derive(Clone)]
pub struct RacingGateway {
    inner: MemoryGateway,
}

impl RacingGateway {
    pub fn new(inner: MemoryGateway) -> Self {
        Self { inner }
    }
}

pub struct RacingSession {
    inner: MemorySession,
    rival: MemoryGateway,
}

impl Gateway for RacingGateway {
    type Session = RacingSession;

    fn session(&self) -> RacingSession {
        RacingSession {
            inner: self.inner.session(),
            rival: self.inner.clone(),
        }
    }
}

impl Session for RacingSession {
    async fn is_provisioned(&self) -> Result<bool, DataError> {
        self.inner.is_provisioned().await
    }

    async fn find_all(&self) -> Result<Vec<CrudDemo>, DataError> {
        self.inner.find_all().await
    }

    async fn find(&self, id: i32) -> Result<Option<CrudDemo>, DataError> {
        self.inner.find(id).await
    }

    async fn any(&self, id: i32) -> Result<bool, DataError> {
        self.inner.any(id).await
    }

    fn add(&mut self, record: CrudDemo) {
        self.inner.add(record);
    }

    fn mark_modified(&mut self, record: &CrudDemo) {
        self.inner.mark_modified(record);
    }

    fn remove(&mut self, record: &CrudDemo) {
        self.inner.remove(record);
    }

    fn pending(&self) -> usize {
        self.inner.pending()
    }

    async fn commit(&mut self) -> Result<usize, DataError> {
        let mut rival = self.rival.session();
        for record in rival.find_all().await? {
            rival.remove(&record);
        }
        rival.commit().await?;
        self.inner.commit().await
    }
}
