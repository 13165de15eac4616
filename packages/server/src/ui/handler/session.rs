//! Per-connection session handling.
//!
//! A connection walks through `Connecting → Naming → Active → Terminated`.
//! Until admission the session writes straight to the socket; once admitted a
//! pusher task owns the write half and drains the client's outbox, so chat
//! messages, announcements and the client's own prompts share one ordered
//! stream.

use std::{io, net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
    task::JoinHandle,
};

use crate::{
    domain::{
        Admission, Client, PusherChannel, PusherInbox, Timestamp, protocol, pusher_channel,
    },
    ui::state::AppState,
    usecase::{JoinError, SendMessageError},
};

enum SessionState {
    Connecting,
    Naming,
    Active(Admission),
    /// Carries the client when it was admitted, so it can be unregistered.
    Terminated(Option<Client>),
}

/// Drive one accepted TCP connection to completion.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    tracing::info!("Client connected: {}", peer);

    let (reader, writer) = stream.into_split();
    Session::new(BufReader::new(reader), writer, state, peer.to_string())
        .run()
        .await;

    tracing::info!("Client disconnected: {}", peer);
}

struct Session<R, W> {
    reader: R,
    /// Handed to the pusher task on admission.
    writer: Option<W>,
    state: Arc<AppState>,
    peer: String,
    outbox: PusherChannel,
    inbox: Option<PusherInbox>,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn new(reader: R, writer: W, state: Arc<AppState>, peer: String) -> Self {
        let (outbox, inbox) = pusher_channel();
        Self {
            reader,
            writer: Some(writer),
            state,
            peer,
            outbox,
            inbox: Some(inbox),
        }
    }

    async fn run(mut self) {
        let mut state = SessionState::Connecting;
        loop {
            state = match state {
                SessionState::Connecting => self.greet().await,
                SessionState::Naming => self.read_name().await,
                SessionState::Active(admission) => self.chat(admission).await,
                SessionState::Terminated(client) => {
                    self.terminate(client).await;
                    return;
                }
            };
        }
    }

    async fn greet(&mut self) -> SessionState {
        let greeting = protocol::greeting(self.state.banner.as_str());
        match self.write_direct(&greeting).await {
            Ok(()) => SessionState::Naming,
            Err(e) => {
                tracing::warn!("Failed to greet {}: {}", self.peer, e);
                SessionState::Terminated(None)
            }
        }
    }

    async fn read_name(&mut self) -> SessionState {
        let line = match read_line(&mut self.reader).await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::debug!("{} closed the connection before naming", self.peer);
                return SessionState::Terminated(None);
            }
            Err(e) => {
                tracing::warn!("Error reading name from {}: {}", self.peer, e);
                return SessionState::Terminated(None);
            }
        };

        match self
            .state
            .join_chat_usecase
            .execute(&line, self.outbox.clone())
            .await
        {
            Ok(admission) => {
                tracing::info!("{} joined as '{}'", self.peer, admission.client.name);
                SessionState::Active(admission)
            }
            Err(JoinError::WrongName) => self.reject_name(protocol::WRONG_NAME_MESSAGE).await,
            Err(JoinError::NameTaken(name)) => {
                tracing::debug!("{} asked for taken name '{}'", self.peer, name);
                self.reject_name(protocol::NAME_TAKEN_MESSAGE).await
            }
            Err(JoinError::ServerFull) => {
                tracing::warn!("Server is full, turning away {}", self.peer);
                if let Err(e) = self.write_direct(protocol::SERVER_FULL_MESSAGE).await {
                    tracing::debug!("Failed to notify {} of full server: {}", self.peer, e);
                }
                SessionState::Terminated(None)
            }
        }
    }

    async fn reject_name(&mut self, reason: &str) -> SessionState {
        match self.write_direct(&protocol::naming_rejection(reason)).await {
            Ok(()) => SessionState::Naming,
            Err(e) => {
                tracing::warn!("Failed to re-prompt {}: {}", self.peer, e);
                SessionState::Terminated(None)
            }
        }
    }

    async fn chat(&mut self, admission: Admission) -> SessionState {
        let Admission { client, replay } = admission;

        // The pusher is not running yet, so anything broadcast since
        // registration waits in the outbox behind the replay.
        let history: String = replay.iter().map(protocol::message_line).collect();
        if let Err(e) = self.write_direct(&history).await {
            tracing::warn!("Failed to replay history to '{}': {}", client.name, e);
            return SessionState::Terminated(Some(client));
        }

        let (Some(writer), Some(inbox)) = (self.writer.take(), self.inbox.take()) else {
            return SessionState::Terminated(Some(client));
        };
        let mut pusher = pusher_loop(inbox, writer);

        let report = self.state.join_chat_usecase.announce_joined(&client).await;
        tracing::debug!(
            "Announced '{}' to {} client(s)",
            client.name,
            report.delivered
        );

        tokio::select! {
            _ = self.message_loop(&client) => pusher.abort(),
            _ = &mut pusher => {
                tracing::debug!("Connection to '{}' can no longer be written", client.name);
            }
        }

        SessionState::Terminated(Some(client))
    }

    async fn message_loop(&mut self, client: &Client) {
        loop {
            let prompt = protocol::prompt(&client.name, Timestamp::new(self.state.clock.now()));
            if self.outbox.send(prompt).await.is_err() {
                return;
            }

            let line = match read_line(&mut self.reader).await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("'{}' closed the connection", client.name);
                    return;
                }
                Err(e) => {
                    tracing::warn!("Error reading message from '{}': {}", client.name, e);
                    return;
                }
            };

            match self.state.send_message_usecase.execute(client, &line).await {
                Ok(report) => {
                    if report.failed > 0 {
                        tracing::warn!(
                            "Message from '{}' could not reach {} client(s)",
                            client.name,
                            report.failed
                        );
                    }
                }
                // Blank input is dropped; the prompt is simply redrawn.
                Err(SendMessageError::EmptyMessage) => {}
            }
        }
    }

    async fn terminate(&mut self, client: Option<Client>) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.shutdown().await;
        }

        let Some(client) = client else {
            return;
        };
        match self.state.leave_chat_usecase.execute(client.handle).await {
            Some(report) => tracing::info!(
                "'{}' left, notified {} client(s)",
                client.name,
                report.delivered
            ),
            None => tracing::debug!("'{}' was already unregistered", client.name),
        }
    }

    async fn write_direct(&mut self, text: &str) -> io::Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "writer owned by pusher")
        })?;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await
    }
}

/// Spawn the task that writes everything queued for this client.
fn pusher_loop<W>(mut inbox: PusherInbox, mut writer: W) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(payload) = inbox.recv().await {
            if let Err(e) = writer.write_all(payload.as_bytes()).await {
                tracing::debug!("Failed to push to client: {}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                tracing::debug!("Failed to flush to client: {}", e);
                break;
            }
        }
    })
}

/// One line including its terminator, or `None` at end of stream.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
