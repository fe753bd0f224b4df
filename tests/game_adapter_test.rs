//! The real play loop behind the TCP server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use qtetris::adapter::{run_server, Adapter, InboundCommand, OutboundMessage, ServerConfig};
use qtetris::core::SessionConfig;
use qtetris::game::Game;
use qtetris::types::Controls;

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn request(&mut self, line: &str) -> serde_json::Value {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
        let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("timed out waiting for a reply")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn act(&mut self, seq: u64, action: &str) -> serde_json::Value {
        self.request(&format!(
            r#"{{"type":"action","seq":{},"action":"{}"}}"#,
            seq, action
        ))
        .await
    }
}

struct Running {
    addr: std::net::SocketAddr,
    stop: Arc<AtomicBool>,
    game: JoinHandle<Game>,
}

impl Running {
    async fn finish(self) -> Game {
        self.stop.store(true, Ordering::Relaxed);
        self.game.await.unwrap()
    }
}

/// Serve a fresh game with seed 5, one frame per millisecond. Gravity is
/// slowed so the first piece stays in play for the whole test.
async fn start() -> Running {
    let config = ServerConfig {
        port: 0,
        max_pending_commands: 8,
        ..ServerConfig::default()
    };
    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });
    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let game = tokio::task::spawn_blocking(move || {
        let mut adapter = Adapter::from_channels(cmd_rx, out_tx);
        let config = SessionConfig {
            fall_speed_ms: 1.0e9,
            ..SessionConfig::default()
        };
        let mut game = Game::new(config, 5);
        while !flag.load(Ordering::Relaxed) {
            game.frame(Controls::idle(), Some(&mut adapter));
            std::thread::sleep(Duration::from_millis(1));
        }
        game
    });

    Running { addr, stop, game }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn game_moves_once_per_sideways_action() {
    let running = start().await;
    let mut client = Client::connect(running.addr).await;
    let welcome = client.request(r#"{"type":"hello","seq":1}"#).await;
    assert_eq!(welcome["role"], "controller");

    let obs = client.act(2, "left").await;
    assert_eq!(obs["seq"], 2);
    assert_eq!(obs["active"]["x"], 2);

    let obs = client.act(3, "left").await;
    assert_eq!(obs["active"]["x"], 1);

    let obs = client.act(4, "right").await;
    assert_eq!(obs["active"]["x"], 2);
    let obs = client.act(5, "right").await;
    assert_eq!(obs["active"]["x"], 3);

    let game = running.finish().await;
    assert_eq!(game.session().active().unwrap().x, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn game_serves_observe_and_reset() {
    let running = start().await;
    let mut client = Client::connect(running.addr).await;
    client.request(r#"{"type":"hello","seq":1}"#).await;

    let obs = client.request(r#"{"type":"observe","seq":2}"#).await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["seq"], 2);
    assert_eq!(obs["active"]["x"], 3);

    let obs = client.act(3, "up").await;
    assert_eq!(obs["seq"], 3);
    let obs = client.act(4, "down").await;
    assert_eq!(obs["seq"], 4);
    assert_eq!(obs["active"]["y"], 1);

    let obs = client.request(r#"{"type":"reset","seq":5}"#).await;
    assert_eq!(obs["seq"], 5);
    assert_eq!(obs["score"], 0);
    assert_eq!(obs["pieces"], 0);

    let game = running.finish().await;
    assert_eq!(game.seed(), 6);
}
