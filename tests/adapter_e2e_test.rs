use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use hexfill::adapter::protocol::create_hello;
use hexfill::adapter::server::{run_server, ServerConfig};
use hexfill::adapter::SharedBestScore;

async fn start_server(store: SharedBestScore) -> (SocketAddr, JoinHandle<()>) {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let (ready_tx, ready_rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        let _ = run_server(config, store, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");
    (addr, handle)
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn next_line(&mut self) -> Option<String> {
        tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
    }

    async fn recv(&mut self) -> serde_json::Value {
        let line = self.next_line().await.expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn hello(&mut self, seed: u32) -> (serde_json::Value, serde_json::Value) {
        let hello = create_hello(1, "e2e-test", "1.0.0", Some(seed));
        self.send(&serde_json::to_string(&hello).unwrap()).await;
        let welcome = self.recv().await;
        let observation = self.recv().await;
        (welcome, observation)
    }
}

#[tokio::test]
async fn adapter_hello_welcome_and_first_observation() {
    let (addr, server) = start_server(SharedBestScore::in_memory()).await;
    let mut client = Client::connect(addr).await;

    let (welcome, obs) = client.hello(7).await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["game_id"], "hexfill");
    assert_eq!(welcome["seed"], 7);
    assert_eq!(welcome["board"]["cell_count"], 54);
    assert_eq!(welcome["palette"].as_array().unwrap().len(), 7);

    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["score"], 0);
    assert_eq!(obs["game_over"], false);
    assert_eq!(obs["pool"].as_array().unwrap().len(), 3);
    assert_eq!(obs["board"].as_array().unwrap().len(), 6);

    server.abort();
}

#[tokio::test]
async fn adapter_command_before_hello_is_rejected() {
    let (addr, server) = start_server(SharedBestScore::in_memory()).await;
    let mut client = Client::connect(addr).await;

    client
        .send(r#"{"type":"command","seq":1,"ts":0,"action":"hint"}"#)
        .await;
    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "handshake_required");

    server.abort();
}

#[tokio::test]
async fn adapter_protocol_mismatch_closes_connection() {
    let (addr, server) = start_server(SharedBestScore::in_memory()).await;
    let mut client = Client::connect(addr).await;

    let hello = create_hello(1, "e2e-test", "9.0.0", None);
    client.send(&serde_json::to_string(&hello).unwrap()).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "protocol_mismatch");
    assert!(client.next_line().await.is_none());

    server.abort();
}

#[tokio::test]
async fn adapter_errors_for_bad_commands() {
    let (addr, server) = start_server(SharedBestScore::in_memory()).await;
    let mut client = Client::connect(addr).await;
    client.hello(3).await;

    client
        .send(r#"{"type":"command","seq":2,"ts":0,"action":"rotate","slot":8}"#)
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_slot");

    client
        .send(r#"{"type":"command","seq":2,"ts":0,"action":"hint"}"#)
        .await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 2);

    client.send(r#"{"type":"command","seq":3,"ts":0,"action":"jump"}"#).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_command");

    client.send("not json").await;
    let err = client.recv().await;
    assert_eq!(err["type"], "error");

    server.abort();
}

#[tokio::test]
async fn adapter_hint_rotate_drop_scores_and_shares_best() {
    let store = SharedBestScore::in_memory();
    let (addr, server) = start_server(store.clone()).await;
    let mut client = Client::connect(addr).await;
    client.hello(11).await;

    client
        .send(r#"{"type":"command","seq":2,"ts":0,"action":"hint"}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["status"], "ok");
    assert_eq!(ack["result"]["kind"], "hint");
    let hint = ack["result"]["hint"].clone();
    let slot = hint["slot"].as_u64().unwrap();
    let rotation = hint["rotation"].as_u64().unwrap();
    let score_delta = hint["score_delta"].as_u64().unwrap();

    let mut seq = 3u64;
    for expected in 1..=rotation {
        client
            .send(&format!(
                r#"{{"type":"command","seq":{seq},"ts":0,"action":"rotate","slot":{slot}}}"#
            ))
            .await;
        let ack = client.recv().await;
        assert_eq!(ack["result"]["rotation_index"], expected);
        let obs = client.recv().await;
        assert_eq!(obs["type"], "observation");
        seq += 1;
    }

    client
        .send(&format!(
            r#"{{"type":"command","seq":{seq},"ts":0,"action":"drop","slot":{slot},"anchor":{{"row":{},"column":{}}}}}"#,
            hint["anchor"]["row"], hint["anchor"]["column"]
        ))
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["status"], "ok");
    assert_eq!(ack["result"]["kind"], "drop");
    assert_eq!(ack["result"]["accepted"], true);
    assert_eq!(ack["result"]["score_delta"], score_delta);

    let obs = client.recv().await;
    assert_eq!(obs["score"], score_delta);
    assert_eq!(obs["best_score"], score_delta);
    assert_eq!(obs["figures_placed"], 1);

    use hexfill::core::BestScoreStore;
    assert_eq!(u64::from(store.get()), score_delta);

    // a second connection starts from the shared best score
    let mut other = Client::connect(addr).await;
    let (_, obs) = other.hello(12).await;
    assert_eq!(obs["score"], 0);
    assert_eq!(obs["best_score"], score_delta);

    server.abort();
}

#[tokio::test]
async fn adapter_rejected_drop_and_restart() {
    let (addr, server) = start_server(SharedBestScore::in_memory()).await;
    let mut client = Client::connect(addr).await;
    client.hello(5).await;

    client
        .send(r#"{"type":"command","seq":2,"ts":0,"action":"drop","slot":0,"point":{"x":-100.0,"y":-100.0}}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["status"], "rejected");
    assert_eq!(ack["result"]["accepted"], false);

    client
        .send(r#"{"type":"command","seq":3,"ts":0,"action":"highlight","slot":0,"anchor":{"row":0,"column":0}}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["result"]["kind"], "highlight");
    assert!(ack["result"]["cells"].as_array().unwrap().is_empty());

    client
        .send(r#"{"type":"command","seq":4,"ts":0,"action":"restart"}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["result"]["round"], 1);
    let obs = client.recv().await;
    assert_eq!(obs["round"], 1);
    assert_eq!(obs["score"], 0);

    server.abort();
}

#[tokio::test]
async fn adapter_anchor_at_coordinate_limit_keeps_connection() {
    let (addr, server) = start_server(SharedBestScore::in_memory()).await;
    let mut client = Client::connect(addr).await;
    client.hello(9).await;

    client
        .send(r#"{"type":"command","seq":2,"ts":0,"action":"drop","slot":0,"anchor":{"row":127,"column":127}}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["status"], "rejected");
    assert_eq!(ack["result"]["accepted"], false);

    client
        .send(r#"{"type":"command","seq":3,"ts":0,"action":"highlight","slot":0,"anchor":{"row":-128,"column":-128}}"#)
        .await;
    let ack = client.recv().await;
    assert!(ack["result"]["cells"].as_array().unwrap().is_empty());

    client
        .send(r#"{"type":"command","seq":4,"ts":0,"action":"hint"}"#)
        .await;
    let ack = client.recv().await;
    assert_eq!(ack["status"], "ok");
    assert_eq!(ack["result"]["kind"], "hint");

    server.abort();
}
