use anyhow::Context;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use prefixprune_core::model::ListResponse;
use prefixprune_core::{
    BindingPage, BindingQuery, ControllerApi, Error, PageRequest, PrefixFilter, Site,
};
use reqwest::Url;
use serde::{Deserialize, de::DeserializeOwned};

const AUTH_HEADER: &str = "X-Auth-Token";
const API_VERSION: &str = "v2.0";
const SITES_VERSION: &str = "v4.7";

/// Connection switches from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientOptions {
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Keep the controller as given even if the token names a region.
    pub ignore_region: bool,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    tenant_id: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str, options: ClientOptions) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(base_url).context("invalid controller URL")?;
        if !options.ignore_region
            && let Some(region) = token_region(token)
            && let Some(regional) = regional_base_url(&base_url, &region)
        {
            tracing::info!(region = %region, controller = %regional, "Using regional controller");
            base_url = regional;
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(options.insecure)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
            tenant_id: String::new(),
        })
    }

    /// Connect with a static auth token and resolve the tenant it belongs to.
    pub async fn login(
        base_url: &str,
        token: &str,
        options: ClientOptions,
    ) -> anyhow::Result<Self> {
        let mut client = Self::new(base_url, token, options)?;
        let profile = client
            .profile()
            .await
            .context("AUTH_TOKEN login failure, please check token")?;
        let tenant_id = profile
            .tenant_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow::anyhow!("AUTH_TOKEN login failure, please check token"))?;
        tracing::info!(tenant_id = %tenant_id, "Authenticated");
        client.tenant_id = tenant_id;
        Ok(client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub async fn profile(&self) -> prefixprune_core::Result<ProfileResponse> {
        let url = self.url(&format!("/{API_VERSION}/api/profile"))?;
        self.send_json(self.http.get(url)).await
    }

    fn url(&self, path: &str) -> prefixprune_core::Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Transport(format!("failed to build API URL: {e}")))
    }

    fn tenant_url(&self, version: &str, path: &str) -> prefixprune_core::Result<Url> {
        self.url(&format!("/{version}/api/tenants/{}/{path}", self.tenant_id))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> prefixprune_core::Result<String> {
        let response = req
            .header(AUTH_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> prefixprune_core::Result<T> {
        let body = self.send(req).await?;
        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }

    async fn send_empty(&self, req: reqwest::RequestBuilder) -> prefixprune_core::Result<()> {
        self.send(req).await.map(|_| ())
    }
}

#[async_trait]
impl ControllerApi for ApiClient {
    async fn list_sites(&self) -> prefixprune_core::Result<Vec<Site>> {
        let url = self.tenant_url(SITES_VERSION, "sites")?;
        tracing::debug!(%url, "Listing sites");
        let response: ListResponse<Site> = self.send_json(self.http.get(url)).await?;
        Ok(response.items)
    }

    async fn list_prefix_filters(&self) -> prefixprune_core::Result<Vec<PrefixFilter>> {
        let url = self.tenant_url(API_VERSION, "ngfwsecuritypolicylocalprefixes")?;
        tracing::debug!(%url, "Listing prefix filters");
        let response: ListResponse<PrefixFilter> = self.send_json(self.http.get(url)).await?;
        Ok(response.items)
    }

    async fn query_bindings(
        &self,
        prefix_id: &str,
        page: PageRequest,
    ) -> prefixprune_core::Result<BindingPage> {
        let url = self.tenant_url(API_VERSION, "sites/ngfwsecuritypolicylocalprefixes/query")?;
        tracing::debug!(%url, prefix_id, page = page.page, "Querying bindings");
        let body = BindingQuery::for_prefix(prefix_id, page);
        self.send_json(self.http.post(url).json(&body)).await
    }

    async fn delete_binding(
        &self,
        site_id: &str,
        binding_id: &str,
    ) -> prefixprune_core::Result<()> {
        let url = self.tenant_url(
            API_VERSION,
            &format!("sites/{site_id}/ngfwsecuritypolicylocalprefixes/{binding_id}"),
        )?;
        tracing::debug!(%url, "Deleting binding");
        self.send_empty(self.http.delete(url)).await
    }

    async fn delete_prefix_filter(&self, prefix_id: &str) -> prefixprune_core::Result<()> {
        let url = self.tenant_url(
            API_VERSION,
            &format!("ngfwsecuritypolicylocalprefixes/{prefix_id}"),
        )?;
        tracing::debug!(%url, "Deleting prefix filter");
        self.send_empty(self.http.delete(url)).await
    }
}

/// Region embedded in an auth token, if any.
///
/// Tokens are dash-separated; the second segment is base64 JSON that may
/// carry a `region` key.
pub fn token_region(token: &str) -> Option<String> {
    let segment = token.split('-').nth(1)?;
    let decoded = STANDARD_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims
        .get("region")?
        .as_str()
        .filter(|region| !region.is_empty())
        .map(str::to_string)
}

/// Rewrite `api.<rest>` to `api.<region>.<rest>`.
///
/// Returns `None` when the host is not an `api.` host or already names the
/// region.
pub fn regional_base_url(base: &Url, region: &str) -> Option<Url> {
    let host = base.host_str()?;
    let rest = host.strip_prefix("api.")?;
    if rest.starts_with(&format!("{region}.")) {
        return None;
    }
    let mut regional = base.clone();
    regional.set_host(Some(&format!("api.{region}.{rest}"))).ok()?;
    Some(regional)
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub tenant_id: Option<String>,
}
