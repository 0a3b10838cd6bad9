use crate::gui_bridge::model::DashboardPayload;
use anyhow::Context;
use fieldcore::DashboardSession;
use log::{info, warn};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::{sync::oneshot, task::JoinHandle};
use warp::Filter;

/// HTTP surface over a running session: view model reads plus the user
/// actions the dashboard exposes.
pub fn routes(
    session: Arc<DashboardSession>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let session_filter = warp::any().map(move || session.clone());

    let view_route = warp::path("view")
        .and(warp::path::end())
        .and(warp::get())
        .and(session_filter.clone())
        .map(|session: Arc<DashboardSession>| {
            warp::reply::json(&DashboardPayload::from_session(&session))
        });

    let metrics_route = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .and(session_filter.clone())
        .map(|session: Arc<DashboardSession>| warp::reply::json(&session.metrics()));

    let directions_route = warp::path!("directions" / usize)
        .and(warp::post())
        .and(session_filter.clone())
        .and_then(|index: usize, session: Arc<DashboardSession>| async move {
            let outcome = session.request_directions(index).await;
            Ok::<_, warp::Rejection>(warp::reply::json(&outcome))
        });

    let notifications_route = warp::path!("notifications" / String)
        .and(warp::post())
        .and(session_filter)
        .and_then(|action: String, session: Arc<DashboardSession>| async move {
            match action.as_str() {
                "open" => session.open_notifications(),
                "close" => session.close_notifications(),
                "clear" => session.clear_notifications(),
                _ => return Err(warp::reject::not_found()),
            }
            let view = session.snapshot();
            Ok::<_, warp::Rejection>(warp::reply::json(&json!({
                "status": "ok",
                "open": view.notifications_open(),
                "notifications": view.notifications().len(),
            })))
        });

    view_route
        .or(metrics_route)
        .or(directions_route)
        .or(notifications_route)
}

/// Bridge that hosts the view-model HTTP endpoint.
pub struct GuiBridge {
    address: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl GuiBridge {
    pub fn start(session: Arc<DashboardSession>, bind: SocketAddr) -> anyhow::Result<Self> {
        let (shutdown, signal) = oneshot::channel::<()>();
        let (address, server) = warp::serve(routes(session))
            .try_bind_with_graceful_shutdown(bind, async move {
                let _ = signal.await;
            })
            .with_context(|| format!("binding GUI bridge on {}", bind))?;
        let task = tokio::spawn(server);
        info!("[GUI] bridge listening on http://{}", address);

        Ok(Self {
            address,
            shutdown,
            task,
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.task.await {
            warn!("[GUI] bridge task failed: {}", err);
        }
    }
}
