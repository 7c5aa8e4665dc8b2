use serde::Serialize;
use tracing::info;

use crate::{RemoteError, Resource, ResourceClient};

impl ResourceClient {
    /// `POST /{resource}`; the response body is not needed and is discarded.
    pub async fn create<B>(&self, resource: Resource, body: &B) -> Result<(), RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(&[resource.path()])?;
        let request = Self::with_json_body(self.http().post(url), body);
        self.execute(request).await?;
        info!(resource = resource.path(), "mutator: created");
        Ok(())
    }

    /// `PATCH /{resource}/{id}`
    pub async fn update<B>(&self, resource: Resource, id: &str, body: &B) -> Result<(), RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(&[resource.path(), id])?;
        let request = Self::with_json_body(self.http().patch(url), body);
        self.execute(request).await?;
        info!(resource = resource.path(), id, "mutator: updated");
        Ok(())
    }

    /// `DELETE /{resource}/{id}`; deleting an absent id is [`RemoteError::NotFound`].
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), RemoteError> {
        let url = self.endpoint(&[resource.path(), id])?;
        let request = self
            .http()
            .delete(url)
            .header(reqwest::header::ACCEPT, "application/json");
        self.execute(request).await?;
        info!(resource = resource.path(), id, "mutator: deleted");
        Ok(())
    }
}
