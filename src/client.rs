//! An HTTP client for the Optimizely X REST API.
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    models::{Audience, Environment, Experiment, Feature, Project},
    ApiClientConfig, Error, Result,
};

/// A client for the Optimizely X REST API.
///
/// In order to create a client instance, first create [`ApiClientConfig`].
///
/// The client holds no state beyond the connection and credential set at
/// construction: every lookup re-fetches from the server. Methods take
/// `&self` and can be called sequentially or concurrently; the client
/// imposes no ordering across calls.
///
/// # Examples
/// ```no_run
/// # use optimizely_client::ApiClientConfig;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> optimizely_client::Result<()> {
/// let client = ApiClientConfig::new("https://api.optimizely.com/v2", "my-token")
///     .to_client()?;
/// let project = client.get_project("12345").await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    // reqwest::Client holds a connection pool internally, so we're reusing
    // the client between requests.
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub(crate) fn new(config: ApiClientConfig) -> Result<ApiClient> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        Ok(ApiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token,
        })
    }

    /// Get a project by id.
    ///
    /// The id comparison is case-normalized to lowercase. The first matching
    /// entry of the project listing wins.
    ///
    /// # Errors
    ///
    /// - [`Error::ProjectNotFound`] if no project in the listing has the
    ///   requested id.
    /// - [`Error::FetchFailed`] if the listing call returns a non-200 status.
    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        let projects = self.list_projects().await?;
        let project = find_project(&projects, project_id)
            .ok_or_else(|| Error::ProjectNotFound {
                id: project_id.to_owned(),
            })?
            .clone();

        log::info!(target: "optimizely", "project {:?} has id {:?}", project.name, project.id);

        Ok(project)
    }

    /// List all projects visible to the token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchFailed`] if the call returns a non-200 status.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.resource_url("projects")?;
        self.fetch_list("projects", url).await
    }

    /// List the experiments of a project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchFailed`] if the call returns a non-200 status.
    pub async fn list_experiments(&self, project_id: &str) -> Result<Vec<Experiment>> {
        let url = self.collection_url("experiments", project_id)?;
        self.fetch_list("experiments", url).await
    }

    /// Get a single experiment by id.
    ///
    /// `_project_id` is accepted for interface compatibility but is not used
    /// in the request; the experiment id alone addresses the resource.
    ///
    /// The response status is not validated: a non-200 body that does not
    /// deserialize as an experiment surfaces as [`Error::Parse`].
    pub async fn get_experiment(
        &self,
        _project_id: &str,
        experiment_id: &str,
    ) -> Result<Experiment> {
        self.get_resource(&format!("experiments/{}", experiment_id))
            .await
    }

    /// Overwrite an experiment with the given record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateFailed`] carrying the experiment id if the
    /// call returns a non-200 status.
    pub async fn update_experiment(
        &self,
        experiment_id: &str,
        experiment: &Experiment,
    ) -> Result<()> {
        self.update_resource("experiment", experiment_id, experiment)
            .await
    }

    /// Get a single feature by id.
    ///
    /// Like [`ApiClient::get_experiment`], the response status is not
    /// validated.
    pub async fn get_feature(&self, feature_id: &str) -> Result<Feature> {
        self.get_resource(&format!("features/{}", feature_id)).await
    }

    /// Overwrite a feature with the given record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateFailed`] carrying the feature id if the call
    /// returns a non-200 status.
    pub async fn update_feature(&self, feature_id: &str, feature: &Feature) -> Result<()> {
        self.update_resource("feature", feature_id, feature).await
    }

    /// Get an environment of a project by its key, case-insensitively.
    ///
    /// Returns `Ok(None)` when the listing succeeds but no environment
    /// matches. This differs from [`ApiClient::get_project`] and
    /// [`ApiClient::get_audience_id`], which treat "no match" as an error;
    /// callers rely on the difference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchFailed`] naming the environment if the listing
    /// call returns a non-200 status.
    pub async fn get_environment(
        &self,
        project_id: &str,
        environment_name: &str,
    ) -> Result<Option<Environment>> {
        let url = self.collection_url("environments", project_id)?;
        let environments: Vec<Environment> = self.fetch_list(environment_name, url).await?;

        Ok(find_environment(&environments, environment_name).cloned())
    }

    /// Resolve an audience name to its integer id, case-insensitively.
    ///
    /// # Errors
    ///
    /// - [`Error::AudienceNotFound`] if no audience in the listing has the
    ///   requested name.
    /// - [`Error::InvalidAudienceId`] if the matched audience id is not an
    ///   integer.
    /// - [`Error::FetchFailed`] if the listing call returns a non-200 status.
    pub async fn get_audience_id(&self, project_id: &str, audience_name: &str) -> Result<i64> {
        log::info!(target: "optimizely", "fetching id for audience {:?}", audience_name);

        let url = self.collection_url("audiences", project_id)?;
        let audiences: Vec<Audience> = self.fetch_list(audience_name, url).await?;

        let audience =
            find_audience(&audiences, audience_name).ok_or_else(|| Error::AudienceNotFound {
                name: audience_name.to_owned(),
            })?;
        let audience_id = parse_audience_id(audience)?;

        log::info!(target: "optimizely", "audience {:?} has id {}", audience.name, audience_id);

        Ok(audience_id)
    }

    fn resource_url(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}/{}", self.base_url, path)).map_err(Error::InvalidBaseUrl)
    }

    fn collection_url(&self, path: &str, project_id: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/{}", self.base_url, path),
            &[("project_id", project_id)],
        )
        .map_err(Error::InvalidBaseUrl)
    }

    async fn fetch_list<T: DeserializeOwned>(&self, resource: &str, url: Url) -> Result<Vec<T>> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        log::debug!(target: "optimizely", "fetched {}: status {}, body: {}", resource, status, body);

        check_fetch_status(resource, status)?;

        Ok(serde_json::from_str(&body)?)
    }

    // Single-resource reads skip status validation; the status and body are
    // debug-logged for troubleshooting.
    async fn get_resource<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.resource_url(path)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        log::debug!(target: "optimizely", "GET {}: status {}, body: {}", path, status, body);

        Ok(serde_json::from_str(&body)?)
    }

    async fn update_resource<T: Serialize>(
        &self,
        entity: &'static str,
        id: &str,
        record: &T,
    ) -> Result<()> {
        let url = self.resource_url(&format!("{}s/{}", entity, id))?;
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(record)
            .send()
            .await?;
        let status = response.status();
        // The body is only logged here; a read failure must not override
        // the status outcome.
        let body = response.text().await.unwrap_or_default();
        log::debug!(target: "optimizely", "PUT {}s/{}: status {}, body: {}", entity, id, status, body);

        check_update_status(entity, id, status)?;

        log::info!(target: "optimizely", "{} with id {:?} updated successfully", entity, id);

        Ok(())
    }
}

fn check_fetch_status(resource: &str, status: StatusCode) -> Result<()> {
    if status != StatusCode::OK {
        log::warn!(target: "optimizely", "received {} while fetching {}", status, resource);
        return Err(Error::FetchFailed {
            resource: resource.to_owned(),
        });
    }
    Ok(())
}

fn check_update_status(entity: &'static str, id: &str, status: StatusCode) -> Result<()> {
    if status != StatusCode::OK {
        log::warn!(target: "optimizely", "unable to update {} with id {:?}: {}", entity, id, status);
        return Err(Error::UpdateFailed {
            entity,
            id: id.to_owned(),
        });
    }
    Ok(())
}

fn find_project<'a>(projects: &'a [Project], project_id: &str) -> Option<&'a Project> {
    let wanted = project_id.to_lowercase();
    projects.iter().find(|project| project.id == wanted)
}

fn find_environment<'a>(
    environments: &'a [Environment],
    environment_name: &str,
) -> Option<&'a Environment> {
    let wanted = environment_name.to_lowercase();
    environments
        .iter()
        .find(|environment| environment.key.to_lowercase() == wanted)
}

fn find_audience<'a>(audiences: &'a [Audience], audience_name: &str) -> Option<&'a Audience> {
    let wanted = audience_name.to_lowercase();
    audiences
        .iter()
        .find(|audience| audience.name.to_lowercase() == wanted)
}

fn parse_audience_id(audience: &Audience) -> Result<i64> {
    audience.id.parse().map_err(|_| Error::InvalidAudienceId {
        name: audience.name.clone(),
        id: audience.id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_owned(),
            name: name.to_owned(),
            platform: "web".to_owned(),
        }
    }

    fn environment(id: &str, name: &str, key: &str) -> Environment {
        Environment {
            id: id.to_owned(),
            name: name.to_owned(),
            key: key.to_owned(),
        }
    }

    fn audience(id: &str, name: &str) -> Audience {
        Audience {
            id: id.to_owned(),
            name: name.to_owned(),
        }
    }

    #[test]
    fn find_project_normalizes_requested_id() {
        let projects = vec![project("abc", "Proj A"), project("xyz", "Proj B")];

        let found = find_project(&projects, "ABC").unwrap();
        assert_eq!(found.id, "abc");
        assert_eq!(found.name, "Proj A");
    }

    #[test]
    fn find_project_misses_unknown_id() {
        let projects = vec![project("abc", "Proj A")];
        assert!(find_project(&projects, "missing").is_none());
    }

    #[test]
    fn find_project_takes_first_match() {
        let projects = vec![project("abc", "first"), project("abc", "second")];
        assert_eq!(find_project(&projects, "abc").unwrap().name, "first");
    }

    #[test]
    fn find_environment_matches_key_case_insensitively() {
        let environments = vec![
            environment("1", "Production", "production"),
            environment("2", "Staging", "staging"),
        ];

        let found = find_environment(&environments, "STAGING").unwrap();
        assert_eq!(found.id, "2");
    }

    #[test]
    fn find_environment_matches_key_not_name() {
        let environments = vec![environment("1", "Production", "prod")];
        assert!(find_environment(&environments, "production").is_none());
        assert!(find_environment(&environments, "prod").is_some());
    }

    #[test]
    fn find_audience_matches_name_case_insensitively() {
        let audiences = vec![audience("42", "Beta Users")];

        let found = find_audience(&audiences, "beta users").unwrap();
        assert_eq!(parse_audience_id(found).unwrap(), 42);
    }

    #[test]
    fn find_audience_misses_unknown_name() {
        let audiences = vec![audience("42", "Beta Users")];
        assert!(find_audience(&audiences, "Alpha Users").is_none());
    }

    #[test]
    fn update_succeeds_on_200() {
        assert!(check_update_status("experiment", "1001", StatusCode::OK).is_ok());
        assert!(check_update_status("feature", "2002", StatusCode::OK).is_ok());
    }

    #[test]
    fn update_fails_with_entity_and_id_on_non_200() {
        assert!(matches!(
            check_update_status("feature", "2002", StatusCode::NOT_FOUND),
            Err(Error::UpdateFailed { entity: "feature", ref id }) if id == "2002"
        ));
        assert!(matches!(
            check_update_status("experiment", "1001", StatusCode::INTERNAL_SERVER_ERROR),
            Err(Error::UpdateFailed { entity: "experiment", ref id }) if id == "1001"
        ));
    }

    #[test]
    fn fetch_succeeds_on_200() {
        assert!(check_fetch_status("projects", StatusCode::OK).is_ok());
    }

    #[test]
    fn fetch_fails_with_resource_name_on_non_200() {
        assert!(matches!(
            check_fetch_status("projects", StatusCode::UNAUTHORIZED),
            Err(Error::FetchFailed { ref resource }) if resource == "projects"
        ));
        // Environment fetches report the environment name, not the
        // collection name.
        assert!(matches!(
            check_fetch_status("staging", StatusCode::BAD_GATEWAY),
            Err(Error::FetchFailed { ref resource }) if resource == "staging"
        ));
    }

    #[test]
    fn parse_audience_id_rejects_non_integer_id() {
        let audience = audience("not-a-number", "Beta Users");
        assert!(matches!(
            parse_audience_id(&audience),
            Err(Error::InvalidAudienceId { ref id, .. }) if id == "not-a-number"
        ));
    }
}
