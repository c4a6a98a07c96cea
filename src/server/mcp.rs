use crate::app::dto::*;
use crate::app::engine::StaleEngine;
use crate::app::error::RequestError;
use rmcp::{
    Json, ServerHandler, ServiceExt, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio,
};
use tokio::task::spawn_blocking;

#[derive(Clone)]
pub struct StaleMcpServer {
    engine: StaleEngine,
    tool_router: ToolRouter<Self>,
}

impl StaleMcpServer {
    pub fn new(engine: StaleEngine) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_router]
impl StaleMcpServer {
    #[tool(
        description = "Compute the stale set (per project) for changed and removed artifacts of a reference project."
    )]
    async fn collect_stale(
        &self,
        params: Parameters<CollectRequest>,
    ) -> Result<Json<CollectResponse>, ErrorData> {
        let engine = self.engine.clone();
        let req = params.0;
        spawn_blocking(move || engine.collect(req))
            .await
            .map_err(join_error)?
            .map(Json)
            .map_err(tool_error)
    }

    #[tool(description = "List workspace projects with their references and build state.")]
    async fn list_projects(&self) -> Result<Json<ProjectsResponse>, ErrorData> {
        let engine = self.engine.clone();
        spawn_blocking(move || engine.projects())
            .await
            .map(Json)
            .map_err(join_error)
    }

    #[tool(description = "Search artifact identities by regular expression.")]
    async fn search_identities(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<Json<SearchResponse>, ErrorData> {
        let engine = self.engine.clone();
        let p = params.0;
        spawn_blocking(move || engine.search(&p.pattern, p.limit))
            .await
            .map_err(join_error)?
            .map(Json)
            .map_err(tool_error)
    }
}

/// Request problems surface as invalid params, the rest as internal errors.
fn tool_error(e: anyhow::Error) -> ErrorData {
    let message = format!("{e:#}");
    if RequestError::is_request_error(&e) {
        ErrorData::invalid_params(message, None)
    } else {
        ErrorData::internal_error(message, None)
    }
}

fn join_error(e: tokio::task::JoinError) -> ErrorData {
    ErrorData::internal_error(format!("task join error: {e}"), None)
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, rmcp::schemars::JsonSchema)]
pub struct SearchParams {
    pub pattern: String,
    pub limit: Option<usize>,
}

#[tool_handler]
impl ServerHandler for StaleMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Compute which artifacts go stale across a multi-project workspace when others change."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
