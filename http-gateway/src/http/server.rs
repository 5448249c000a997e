use super::handle;
use crate::http::response::ErrorResponse;
use crate::{Config, Error, Result, Verifier};
use common::CommandRegistry;
use sharder::{RestClient, SessionStatus};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::reply::Response;
use warp::{Filter, Rejection};

pub struct Server {
    pub config: Config,
    verifier: Arc<Verifier>,
    registry: Arc<CommandRegistry>,
    status: Arc<SessionStatus>,
    rest: Option<Arc<RestClient>>,
}

impl Server {
    /// `rest` is only present when a bot token is configured, `/command` answers 503 otherwise
    pub fn new(
        config: Config,
        registry: Arc<CommandRegistry>,
        status: Arc<SessionStatus>,
        rest: Option<Arc<RestClient>>,
    ) -> Result<Server> {
        let verifier = config.verifier()?;
        if !verifier.is_configured() {
            warn!("DISCORD_PUBLIC_KEY is not set, every signed request will be rejected");
        }

        Ok(Server {
            config,
            verifier: Arc::new(verifier),
            registry,
            status,
            rest,
        })
    }

    pub async fn start(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let address = self.config.socket_addr()?;

        let (address, server) =
            warp::serve(self.filter()).try_bind_with_graceful_shutdown(address, shutdown)?;

        info!(%address, "Listening for interactions");
        server.await;
        info!("Server stopped");

        Ok(())
    }

    pub fn filter(&self) -> impl Filter<Extract = impl warp::Reply, Error = Rejection> + Clone {
        let root = warp::path::end()
            .and(warp::get())
            .and_then(handle::root);

        let health = warp::path!("health")
            .and(warp::get())
            .and(with_state(Arc::clone(&self.status)))
            .and_then(handle::health);

        let bot_status = warp::path!("bot" / "status")
            .and(warp::get())
            .and(with_state(Arc::clone(&self.status)))
            .and_then(handle::bot_status);

        // `/discord/interaction` is the older webhook path, kept for existing application settings
        let interactions = warp::path!("interactions")
            .or(warp::path!("discord" / "interaction"))
            .unify()
            .and(warp::post())
            .and(with_state(Arc::clone(&self.verifier)))
            .and(with_state(Arc::clone(&self.registry)))
            .and(warp::header::headers_cloned())
            .and(warp::body::bytes())
            .and_then(handle::interactions);

        let command = warp::path!("command")
            .and(warp::post())
            .and(with_state(self.rest.clone()))
            .and(with_state(Arc::clone(&self.status)))
            .and(warp::body::bytes())
            .and_then(handle::command);

        let routes = root
            .or(health)
            .unify()
            .or(bot_status)
            .unify()
            .or(interactions)
            .unify()
            .or(command)
            .unify();

        #[cfg(feature = "test-endpoint")]
        let routes = routes
            .or(warp::path!("test-interaction")
                .and(warp::post())
                .and(with_state(Arc::clone(&self.registry)))
                .and(warp::body::bytes())
                .and_then(handle::test_interaction))
            .unify();

        // paths are matched before methods so unknown routes stay 404 rather than 405
        routes.with(warp::trace::request()).recover(recover)
    }
}

fn with_state<T: Clone + Send + Sync + 'static>(
    state: T,
) -> impl Filter<Extract = (T,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn recover(rejection: Rejection) -> Result<Response, Rejection> {
    match rejection.find::<Error>() {
        Some(err) => {
            let status_code = err.status_code();

            if status_code.is_server_error() {
                error!(error = %err, status = status_code.as_u16(), "Request failed");
            } else {
                warn!(error = %err, status = status_code.as_u16(), "Request rejected");
            }

            Ok(ErrorResponse::from(err).into_response())
        }
        None => Err(rejection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::tests::{keypair, sign};
    use serde_json::{json, Value};
    use warp::http::StatusCode;

    const TIMESTAMP: &str = "1700000000";

    fn server() -> Server {
        server_with_rest(None)
    }

    fn server_with_rest(rest: Option<Arc<RestClient>>) -> Server {
        let public_key = hex::encode(keypair().public.as_bytes());
        let config: Config = envy::from_iter(vec![(
            String::from("DISCORD_PUBLIC_KEY"),
            public_key,
        )])
        .unwrap();

        Server::new(
            config,
            Arc::new(CommandRegistry::builtin()),
            Arc::new(SessionStatus::new()),
            rest,
        )
        .unwrap()
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    async fn post_signed(body: &str) -> warp::http::Response<warp::hyper::body::Bytes> {
        let signature = sign(&keypair(), TIMESTAMP, body.as_bytes());

        warp::test::request()
            .method("POST")
            .path("/interactions")
            .header("x-signature-ed25519", signature)
            .header("x-signature-timestamp", TIMESTAMP)
            .body(body)
            .reply(&server().filter())
            .await
    }

    #[tokio::test]
    async fn test_signed_ping() {
        let res = post_signed(r#"{"type":1}"#).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res.body()), json!({ "type": 1 }));
    }

    #[tokio::test]
    async fn test_corrupted_signature_is_unauthorized() {
        let body = r#"{"type":1}"#;
        let mut signature = sign(&keypair(), TIMESTAMP, body.as_bytes());
        let flipped = if signature.starts_with('0') { "1" } else { "0" };
        signature.replace_range(0..1, flipped);

        let res = warp::test::request()
            .method("POST")
            .path("/interactions")
            .header("x-signature-ed25519", signature)
            .header("x-signature-timestamp", TIMESTAMP)
            .body(body)
            .reply(&server().filter())
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(res.body()),
            json!({ "error": "invalid request signature" })
        );
    }

    #[tokio::test]
    async fn test_missing_headers_are_unauthorized() {
        let res = warp::test::request()
            .method("POST")
            .path("/interactions")
            .body(r#"{"type":1}"#)
            .reply(&server().filter())
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unreadable_signature_header_is_unauthorized() {
        let body = r#"{"type":1}"#;

        let res = warp::test::request()
            .method("POST")
            .path("/interactions")
            .header("x-signature-ed25519", &b"\xffabc"[..])
            .header("x-signature-timestamp", TIMESTAMP)
            .body(body)
            .reply(&server().filter())
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(res.body()),
            json!({ "error": "invalid request signature" })
        );

        let signature = sign(&keypair(), TIMESTAMP, body.as_bytes());
        let res = warp::test::request()
            .method("POST")
            .path("/interactions")
            .header("x-signature-ed25519", signature)
            .header("x-signature-timestamp", &b"17\xe900"[..])
            .body(body)
            .reply(&server().filter())
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_legacy_interaction_path() {
        let body = r#"{"type":1}"#;
        let signature = sign(&keypair(), TIMESTAMP, body.as_bytes());
        let filter = server().filter();

        let res = warp::test::request()
            .method("POST")
            .path("/discord/interaction")
            .header("x-signature-ed25519", signature)
            .header("x-signature-timestamp", TIMESTAMP)
            .body(body)
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res.body()), json!({ "type": 1 }));

        let res = warp::test::request()
            .method("POST")
            .path("/discord/interaction")
            .body(body)
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signed_here_command() {
        let body = json!({
            "type": 2,
            "data": { "name": "here" },
            "guild_id": "g1",
            "channel_id": "c1",
            "member": { "user": { "id": "u1" } }
        })
        .to_string();

        let res = post_signed(&body).await;
        assert_eq!(res.status(), StatusCode::OK);

        let json = json_body(res.body());
        assert_eq!(json["type"], 4);

        let content = json["data"]["content"].as_str().unwrap();
        assert!(content.contains("g1"));
        assert!(content.contains("c1"));
        assert!(content.contains("u1"));
    }

    #[tokio::test]
    async fn test_signed_malformed_body_is_bad_request() {
        let res = post_signed("{not json").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = post_signed(r#"{"type":2,"data":{}}"#).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(res.body()),
            json!({ "error": "malformed interaction payload" })
        );
    }

    #[tokio::test]
    async fn test_status_routes() {
        let filter = server().filter();

        let res = warp::test::request().path("/").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res.body())["status"], "running");

        let res = warp::test::request().path("/health").reply(&filter).await;
        assert_eq!(
            json_body(res.body()),
            json!({ "status": "healthy", "bot_ready": false })
        );

        let res = warp::test::request().path("/bot/status").reply(&filter).await;
        let json = json_body(res.body());
        assert_eq!(json["bot_ready"], false);
        assert_eq!(json["guilds"], 0);
        assert!(json["bot_user"].is_null());
    }

    #[tokio::test]
    async fn test_command_without_bot_is_unavailable() {
        let res = warp::test::request()
            .method("POST")
            .path("/command")
            .body(r#"{"command":"ping","user_id":"1","channel_id":"2"}"#)
            .reply(&server().filter())
            .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(res.body()), json!({ "error": "bot is not running" }));
    }

    // the client is never used: validation fails before any Discord request is made
    #[tokio::test]
    async fn test_command_is_validated_before_calling_discord() {
        let rest = Arc::new(RestClient::new("not-a-real-token").unwrap());
        let filter = server_with_rest(Some(rest)).filter();

        let res = warp::test::request()
            .method("POST")
            .path("/command")
            .body(r#"{"command":"xyzzy","user_id":"1","channel_id":"2"}"#)
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res.body()), json!({ "error": "unknown command" }));

        let res = warp::test::request()
            .method("POST")
            .path("/command")
            .body(r#"{"command":"serverinfo","user_id":"1","channel_id":"2"}"#)
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(res.body()),
            json!({ "error": "guild_id is required for this command" })
        );

        let res = warp::test::request()
            .method("POST")
            .path("/command")
            .body(r#"{"command":"ping","user_id":"1","channel_id":"general"}"#)
            .reply(&filter)
            .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[cfg(not(feature = "test-endpoint"))]
    #[tokio::test]
    async fn test_unsigned_endpoint_is_not_served() {
        let res = warp::test::request()
            .method("POST")
            .path("/test-interaction")
            .body(r#"{"type":1}"#)
            .reply(&server().filter())
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[cfg(feature = "test-endpoint")]
    #[tokio::test]
    async fn test_unsigned_endpoint_dispatches() {
        let res = warp::test::request()
            .method("POST")
            .path("/test-interaction")
            .body(r#"{"type":2,"data":{"name":"hello"},"user":{"id":"42"}}"#)
            .reply(&server().filter())
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            json_body(res.body()),
            json!({ "type": 4, "data": { "content": "Hello, <@42>!" } })
        );
    }
}
