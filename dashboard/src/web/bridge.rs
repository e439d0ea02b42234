use crate::web::model::{CalculateForm, EditReply, ErrorReply, InputEdit, PageQuery};
use crate::web::page::{render_page, PageContext};
use crate::workflow::runner::Runner;
use anyhow::Context;
use log::{error, info, warn};
use pgcore::panels::{StaticPanels, Tab};
use pgcore::prelude::{DashboardError, DashboardResult};
use pgcore::session::Session;
use pgcore::telemetry::MetricsRecorder;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter, Rejection, Reply};

#[derive(Debug)]
struct ApiError(DashboardError);

impl warp::reject::Reject for ApiError {}

/// State shared by every route: the one live session plus read-only content.
#[derive(Clone)]
struct BridgeContext {
    session: Arc<RwLock<Session>>,
    runner: Arc<Runner>,
    panels: Arc<StaticPanels>,
    metrics: Arc<MetricsRecorder>,
}

impl BridgeContext {
    fn read(&self) -> DashboardResult<RwLockReadGuard<'_, Session>> {
        self.session.read().map_err(|_| DashboardError::StatePoisoned)
    }

    fn write(&self) -> DashboardResult<RwLockWriteGuard<'_, Session>> {
        self.session.write().map_err(|_| DashboardError::StatePoisoned)
    }

    fn reject(&self, err: DashboardError) -> Rejection {
        self.metrics.record_rejected();
        warn!("request rejected: {}", err);
        warp::reject::custom(ApiError(err))
    }
}

/// Hosts the browser page and the JSON API for a single session.
pub struct DashboardBridge {
    context: BridgeContext,
}

impl DashboardBridge {
    pub fn new(session: Session, runner: Arc<Runner>, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            context: BridgeContext {
                session: Arc::new(RwLock::new(session)),
                runner,
                panels: Arc::new(StaticPanels::new()),
                metrics,
            },
        }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        let context = self.context.clone();
        let with_context = warp::any().map(move || context.clone());

        let index = warp::path::end()
            .and(warp::get())
            .and(warp::query::<PageQuery>())
            .and(with_context.clone())
            .and_then(index_route);

        let calculate_form = warp::path("calculate")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::form::<CalculateForm>())
            .and(with_context.clone())
            .and_then(calculate_form_route);

        let session = warp::path!("api" / "session")
            .and(warp::get())
            .and(with_context.clone())
            .and_then(session_route);

        let inputs = warp::path!("api" / "inputs")
            .and(warp::post())
            .and(warp::body::json::<InputEdit>())
            .and(with_context.clone())
            .and_then(inputs_route);

        let calculate = warp::path!("api" / "calculate")
            .and(warp::post())
            .and(with_context.clone())
            .and_then(calculate_route);

        let panels = warp::path!("api" / "panels")
            .and(warp::get())
            .and(with_context.clone())
            .map(|ctx: BridgeContext| warp::reply::json(&*ctx.panels));

        let metrics = warp::path!("api" / "metrics")
            .and(warp::get())
            .and(with_context)
            .map(|ctx: BridgeContext| warp::reply::json(&ctx.metrics.snapshot()));

        index
            .or(calculate_form)
            .or(session)
            .or(inputs)
            .or(calculate)
            .or(panels)
            .or(metrics)
            .recover(handle_rejection)
    }

    /// Serves the routes on a dedicated thread until the process exits.
    pub fn spawn(&self, addr: SocketAddr) -> anyhow::Result<thread::JoinHandle<()>> {
        let routes = self.routes();
        thread::Builder::new()
            .name("dashboard-http".into())
            .spawn(move || {
                let runtime = match Builder::new_current_thread().enable_all().build() {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        error!("failed to build HTTP runtime: {}", err);
                        return;
                    }
                };
                runtime.block_on(async move {
                    info!("dashboard listening on http://{}", addr);
                    warp::serve(routes).run(addr).await;
                });
            })
            .context("spawning dashboard HTTP thread")
    }

    pub fn publish_status(&self, message: &str) {
        info!("[dashboard] {}", message);
    }
}

async fn index_route(query: PageQuery, ctx: BridgeContext) -> Result<impl Reply, Rejection> {
    let tab = match query.tab.as_deref() {
        Some(key) => key.parse::<Tab>().map_err(|err| ctx.reject(err))?,
        None => Tab::default(),
    };
    let session = ctx.read().map_err(|err| ctx.reject(err))?;
    let snapshot = ctx.runner.snapshot(&session);
    drop(session);

    Ok(warp::reply::html(render_page(&PageContext {
        snapshot: &snapshot,
        panels: &ctx.panels,
        tab,
        calculation: None,
    })))
}

async fn calculate_form_route(
    form: CalculateForm,
    ctx: BridgeContext,
) -> Result<impl Reply, Rejection> {
    let (snapshot, calculation) = {
        let mut session = ctx.write().map_err(|err| ctx.reject(err))?;
        ctx.runner
            .apply_form(&mut session, &form)
            .map_err(|err| ctx.reject(err))?;
        (
            ctx.runner.snapshot(&session),
            ctx.runner.calculate(&session),
        )
    };

    Ok(warp::reply::html(render_page(&PageContext {
        snapshot: &snapshot,
        panels: &ctx.panels,
        tab: Tab::Pavement,
        calculation: Some(&calculation),
    })))
}

async fn session_route(ctx: BridgeContext) -> Result<impl Reply, Rejection> {
    let session = ctx.read().map_err(|err| ctx.reject(err))?;
    Ok(warp::reply::json(&ctx.runner.snapshot(&session)))
}

async fn inputs_route(edit: InputEdit, ctx: BridgeContext) -> Result<impl Reply, Rejection> {
    let mut session = ctx.write().map_err(|err| ctx.reject(err))?;
    let clamped = ctx
        .runner
        .apply_edit(&mut session, &edit)
        .map_err(|err| ctx.reject(err))?;
    Ok(warp::reply::json(&EditReply {
        status: "ok".into(),
        clamped,
        inputs: session.inputs().clone(),
    }))
}

async fn calculate_route(ctx: BridgeContext) -> Result<impl Reply, Rejection> {
    let session = ctx.read().map_err(|err| ctx.reject(err))?;
    Ok(warp::reply::json(&ctx.runner.calculate(&session)))
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(ApiError(inner)) = err.find::<ApiError>() {
        let status = if inner.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, inner.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(body) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, body.to_string())
    } else if let Some(query) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, query.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        error!("unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorReply {
            status: "error".into(),
            message,
        }),
        status,
    ))
}
