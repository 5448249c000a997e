use super::payloads::{self, Dispatch, Hello, InvalidSession, Opcode, Payload, Ready};
use super::{CloseEvent, GatewayError, OutboundMessage};
use crate::{GatewayEnricher, Options, RestClient, SessionStatus};

use common::CommandRegistry;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use model::guild::UnavailableGuild;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WebSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WebSocketTx = SplitSink<WebSocket, Message>;
type WebSocketRx = SplitStream<WebSocket>;

const GATEWAY_URL: &str = "wss://gateway.discord.gg";
const GATEWAY_QUERY: &str = "?v=10&encoding=json";
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// The single gateway connection of this process. Interactions pushed over the gateway go
/// through the same command registry as the webhook, with [`GatewayEnricher`] on top.
pub struct Shard {
    identify: payloads::Identify,
    registry: Arc<CommandRegistry>,
    rest: Arc<RestClient>,
    enricher: GatewayEnricher,
    status: Arc<SessionStatus>,
    session: RwLock<Session>,
}

#[derive(Default)]
struct Session {
    id: Option<String>,
    seq: Option<u64>,
    resume_url: Option<String>,
}

/// Per-websocket state, replaced on every reconnect
struct Connection {
    writer: mpsc::Sender<OutboundMessage>,
    kill_tx: mpsc::Sender<()>,
    heartbeat: Mutex<HeartbeatState>,
    heartbeat_handle: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Default)]
struct HeartbeatState {
    last_sent: Option<Instant>,
    acked: bool,
}

impl Connection {
    fn kill(&self) {
        // a full channel means a kill is already pending
        let _ = self.kill_tx.try_send(());
    }
}

impl Shard {
    pub fn new(
        options: Options,
        registry: Arc<CommandRegistry>,
        rest: Arc<RestClient>,
        status: Arc<SessionStatus>,
    ) -> Arc<Shard> {
        let identify = payloads::Identify::new(options.token.to_string(), options.intents);
        let enricher = GatewayEnricher::new(Arc::clone(&rest), Arc::clone(&status));

        Arc::new(Shard {
            identify,
            registry,
            rest,
            enricher,
            status,
            session: RwLock::new(Session::default()),
        })
    }

    /// Keeps the session alive until Discord closes it with a code that rules out reconnecting
    pub async fn run(self: Arc<Self>) -> Result<(), GatewayError> {
        loop {
            let res = Arc::clone(&self).connect().await;
            self.status.set_disconnected();

            match res {
                Ok(Some(close)) if !close.should_reconnect() => {
                    error!(code = close.status_code, reason = %close.error, "Gateway closed with a fatal code");
                    return Err(GatewayError::FatalClose(close));
                }
                Ok(Some(close)) => {
                    if !close.can_resume() {
                        self.reset_session();
                    }

                    warn!(code = close.status_code, reason = %close.error, "Gateway closed the connection, reconnecting");
                }
                Ok(None) => info!("Gateway connection ended, reconnecting"),
                Err(e) => warn!(error = %e, "Gateway connection failed, reconnecting"),
            }

            sleep(RECONNECT_DELAY).await;
        }
    }

    async fn connect(self: Arc<Self>) -> Result<Option<CloseEvent>, GatewayError> {
        let uri = url::Url::parse(&self.gateway_url())?;
        debug!(%uri, "Connecting to gateway");

        let (wss, _) = connect_async(uri).await?;
        let (ws_tx, ws_rx) = wss.split();

        // start writer
        let (writer_tx, writer_rx) = mpsc::channel(16);
        tokio::spawn(Shard::handle_writes(ws_tx, writer_rx));

        let (kill_tx, kill_rx) = mpsc::channel(1);
        let conn = Arc::new(Connection {
            writer: writer_tx,
            kill_tx,
            heartbeat: Mutex::new(HeartbeatState::default()),
            heartbeat_handle: Mutex::new(None),
        });

        let res = Arc::clone(&self)
            .listen(Arc::clone(&conn), ws_rx, kill_rx)
            .await;

        let heartbeat_handle = conn.heartbeat_handle.lock().take();
        if let Some(handle) = heartbeat_handle {
            handle.abort();
        }

        res
    }

    fn gateway_url(&self) -> String {
        let session = self.session.read();

        let base = match (&session.id, &session.resume_url) {
            (Some(_), Some(resume_url)) => resume_url.as_str(),
            _ => GATEWAY_URL,
        };

        format!("{}/{}", base.trim_end_matches('/'), GATEWAY_QUERY)
    }

    fn reset_session(&self) {
        *self.session.write() = Session::default();
    }

    async fn handle_writes(mut ws_tx: WebSocketTx, mut rx: mpsc::Receiver<OutboundMessage>) {
        while let Some(msg) = rx.recv().await {
            let res = ws_tx.send(Message::Text(msg.message)).await;

            if msg.tx.send(res).is_err() {
                debug!("Write result receiver was dropped");
            }
        }
    }

    async fn write<T: Serialize>(&self, conn: &Connection, msg: T) -> Result<(), GatewayError> {
        let (tx, rx) = oneshot::channel();

        OutboundMessage::new(msg, tx)?.send(&conn.writer).await?;
        rx.await??;

        Ok(())
    }

    async fn listen(
        self: Arc<Self>,
        conn: Arc<Connection>,
        mut ws_rx: WebSocketRx,
        mut kill_rx: mpsc::Receiver<()>,
    ) -> Result<Option<CloseEvent>, GatewayError> {
        loop {
            tokio::select! {
                _ = kill_rx.recv() => {
                    debug!("Received kill message");
                    return Ok(None);
                }

                payload = ws_rx.next() => match payload {
                    None => return Ok(None),
                    Some(Err(e)) => return Err(e.into()),
                    Some(Ok(Message::Close(frame))) => {
                        return Ok(frame.map(|frame| {
                            CloseEvent::new(u16::from(frame.code), frame.reason.into_owned())
                        }));
                    }
                    Some(Ok(Message::Text(data))) => {
                        if let Err(e) = Arc::clone(&self).process_payload(&conn, data.as_bytes()).await {
                            error!(error = %e, "Error processing gateway payload");
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    async fn process_payload(
        self: Arc<Self>,
        conn: &Arc<Connection>,
        raw: &[u8],
    ) -> Result<(), GatewayError> {
        let payload: Payload = serde_json::from_slice(raw)?;

        if let Some(seq) = payload.seq {
            self.session.write().seq = Some(seq);
        }

        match payload.opcode {
            Opcode::Dispatch => {
                let dispatch: Dispatch = serde_json::from_slice(raw)?;
                self.handle_event(dispatch)?;
            }

            Opcode::Heartbeat => self.do_heartbeat(conn).await?,

            Opcode::Reconnect => {
                info!("Discord requested a reconnect");
                conn.kill();
            }

            Opcode::InvalidSession => {
                let invalid: InvalidSession = serde_json::from_slice(raw)?;
                warn!(resumable = invalid.is_resumable, "Session was invalidated");

                if !invalid.is_resumable {
                    self.reset_session();
                }

                conn.kill();
            }

            Opcode::Hello => {
                let hello: Hello = serde_json::from_slice(raw)?;
                let interval = Duration::from_millis(hello.data.heartbeat_interval);

                let resume = {
                    let session = self.session.read();
                    session.id.clone().zip(session.seq)
                };

                match resume {
                    Some((session_id, seq)) => {
                        let token = self.identify.data.token.clone();
                        self.write(conn, payloads::Resume::new(token, session_id, seq))
                            .await?;
                        info!(seq, "Sent RESUME");
                    }
                    None => {
                        self.write(conn, &self.identify).await?;
                        info!("Sent IDENTIFY");
                    }
                }

                let handle = Arc::clone(&self).start_heartbeat(Arc::clone(conn), interval);
                let previous = conn.heartbeat_handle.lock().replace(handle);
                if let Some(previous) = previous {
                    previous.abort();
                }
            }

            Opcode::HeartbeatAck => {
                let mut heartbeat = conn.heartbeat.lock();
                heartbeat.acked = true;

                if let Some(sent) = heartbeat.last_sent {
                    self.status.set_latency(sent.elapsed());
                }
            }

            _ => {}
        }

        Ok(())
    }

    fn handle_event(self: &Arc<Self>, dispatch: Dispatch) -> Result<(), GatewayError> {
        match dispatch.event_type.as_str() {
            "READY" => {
                let ready: Ready = serde_json::from_value(dispatch.data)?;
                info!(
                    user = %ready.user.username,
                    id = %ready.user.id,
                    guilds = ready.guilds.len(),
                    version = ready.gateway_version,
                    "Ready"
                );

                {
                    let mut session = self.session.write();
                    session.id = Some(ready.session_id);
                    session.resume_url = Some(ready.resume_gateway_url);
                }

                self.status
                    .set_ready(ready.user, ready.guilds.into_iter().map(|guild| guild.id));
            }

            "RESUMED" => {
                info!("Resumed");
                self.status.set_resumed();
            }

            "GUILD_CREATE" => {
                let guild: UnavailableGuild = serde_json::from_value(dispatch.data)?;
                self.status.add_guild(guild.id);
            }

            "GUILD_DELETE" => {
                let guild: UnavailableGuild = serde_json::from_value(dispatch.data)?;

                // an outage sets unavailable, otherwise we were removed
                if guild.unavailable != Some(true) {
                    self.status.remove_guild(guild.id);
                }
            }

            "INTERACTION_CREATE" => {
                let shard = Arc::clone(self);
                let data = dispatch.data;

                tokio::spawn(async move {
                    if let Err(e) = shard.handle_interaction(data).await {
                        error!(error = %e, "Error handling interaction");
                    }
                });
            }

            other => debug!(event = other, "Ignoring event"),
        }

        Ok(())
    }

    async fn handle_interaction(&self, data: Value) -> Result<(), GatewayError> {
        let interaction = common::parse_value(data)?;

        let (id, token) = match (&interaction.id, &interaction.token) {
            (Some(id), Some(token)) => (id.clone(), token.clone()),
            _ => return Err(GatewayError::MissingInteractionToken),
        };

        debug!(command = ?interaction.command_name, guild = ?interaction.guild_id, "Handling interaction");

        let response = self
            .registry
            .dispatch_enriched(&interaction, &self.enricher)
            .await;

        self.rest
            .create_interaction_response(&id, &token, &response)
            .await?;

        Ok(())
    }

    fn start_heartbeat(self: Arc<Self>, conn: Arc<Connection>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                sleep(interval).await;

                let missed = {
                    let heartbeat = conn.heartbeat.lock();
                    heartbeat.last_sent.is_some() && !heartbeat.acked
                };

                if missed {
                    warn!("Heartbeat was not acknowledged, reconnecting");
                    conn.kill();
                    break;
                }

                if let Err(e) = self.do_heartbeat(&conn).await {
                    error!(error = %e, "Error sending heartbeat, reconnecting");
                    conn.kill();
                    break;
                }
            }
        })
    }

    async fn do_heartbeat(&self, conn: &Connection) -> Result<(), GatewayError> {
        let seq = self.session.read().seq;

        // marked before writing so a fast ACK can't be overwritten
        {
            let mut heartbeat = conn.heartbeat.lock();
            heartbeat.last_sent = Some(Instant::now());
            heartbeat.acked = false;
        }

        self.write(conn, payloads::Heartbeat::new(seq)).await
    }
}
