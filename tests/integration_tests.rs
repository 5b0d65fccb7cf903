//! Integration tests for the networked game server
//!
//! These tests run a real engine task and TCP gateway on an ephemeral port and
//! drive them through raw HTTP/1.0 requests.

use serde_json::Value;
use server::assets::RenderAssets;
use server::commands::CommandEngine;
use server::engine::{Engine, EngineHandle};
use server::game::MatchRules;
use server::network::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::sleep;

const SHORT_DELAY: Duration = Duration::from_millis(50);
const SETTLE: Duration = Duration::from_millis(200);

fn fast_rules() -> MatchRules {
    MatchRules {
        stage_advance_delay: SHORT_DELAY,
        respawn_delay: SHORT_DELAY,
        ..MatchRules::default()
    }
}

async fn spawn_server(rules: MatchRules) -> (SocketAddr, EngineHandle) {
    let assets = Arc::new(RenderAssets::generate().unwrap());
    let (engine, handle) = Engine::new(CommandEngine::new(rules, assets).unwrap());
    tokio::spawn(engine.run());

    let server = Server::bind("127.0.0.1:0", handle.clone(), std::env::temp_dir())
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    (addr, handle)
}

/// Sends raw bytes and returns (status code, body).
async fn raw_request(addr: SocketAddr, request: &str) -> (u16, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut data = Vec::new();
    stream.read_to_end(&mut data).await.unwrap();

    let header_end = data
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("response has no status code");
    (status, data[header_end + 4..].to_vec())
}

async fn command(addr: SocketAddr, line: &str) -> Value {
    let path = line.split_whitespace().collect::<Vec<_>>().join("/");
    let request = format!("GET /game/{} HTTP/1.0\r\nHost: test\r\n\r\n", path);
    let (status, body) = raw_request(addr, &request).await;
    assert_eq!(status, 200, "command '{}' was not answered with 200", line);
    serde_json::from_slice(&body).unwrap()
}

async fn game_info(addr: SocketAddr) -> Value {
    command(addr, "get_game_state").await["game_info"].clone()
}

async fn win_stage(addr: SocketAddr, player: &str, gems: &[&str]) {
    for gem in gems {
        let result = command(addr, &format!("collect_gem {} {}", player, gem)).await;
        assert_eq!(result["status"], "OK", "collecting {}: {}", gem, result);
    }
    let exit = command(addr, &format!("player_at_exit {}", player)).await;
    assert_eq!(exit["message"], "Player at exit processed.");
}

const STAGE_ONE_BLACK_GEMS: [&str; 2] = ["black_gem_0", "black_gem_2"];
const STAGE_TWO_BLACK_GEMS: [&str; 4] = ["black_gem_1", "black_gem_2", "black_gem_5", "black_gem_7"];

/// GATEWAY TESTS
mod gateway_tests {
    use super::*;

    /// Tests the plain banner served at the root path
    #[tokio::test]
    async fn root_serves_banner() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        let (status, body) = raw_request(addr, "GET / HTTP/1.0\r\n\r\n").await;
        assert_eq!(status, 200);
        assert_eq!(String::from_utf8(body).unwrap(), "Bones game server");
    }

    /// Tests that malformed request lines and unsupported methods are rejected
    #[tokio::test]
    async fn malformed_requests_get_400() {
        let (addr, _handle) = spawn_server(fast_rules()).await;

        let (status, _) = raw_request(addr, "GET\r\n\r\n").await;
        assert_eq!(status, 400);

        let (status, _) = raw_request(addr, "DELETE /game/reset_game HTTP/1.0\r\n\r\n").await;
        assert_eq!(status, 400);
    }

    /// Tests the POST placeholder and missing static files
    #[tokio::test]
    async fn post_and_missing_files() {
        let (addr, _handle) = spawn_server(fast_rules()).await;

        let (status, body) = raw_request(addr, "POST /upload HTTP/1.0\r\n\r\n").await;
        assert_eq!(status, 200);
        assert_eq!(body, b"empty");

        let (status, _) = raw_request(addr, "GET /definitely-not-here.html HTTP/1.0\r\n\r\n").await;
        assert_eq!(status, 404);
    }

    /// Tests that paths without a dedicated route go to static file serving
    #[tokio::test]
    async fn unrouted_paths_fall_through_to_static_files() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        for path in ["/video", "/santai"] {
            let (status, body) = raw_request(addr, &format!("GET {} HTTP/1.0\r\n\r\n", path)).await;
            assert_eq!(status, 404, "{} should not have a fixed route", path);
            assert!(body.is_empty());
        }
    }

    /// Tests that unknown commands come back as error results, not HTTP errors
    #[tokio::test]
    async fn unknown_command_is_error_result() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        let result = command(addr, "teleport player_black").await;
        assert_eq!(result["status"], "ERROR");
        assert_eq!(result["message"], "Unknown command");
    }

    /// Tests that a stopped engine yields 503 instead of hanging
    #[tokio::test]
    async fn stopped_engine_is_unavailable() {
        let (addr, handle) = spawn_server(fast_rules()).await;
        handle.shutdown();
        sleep(Duration::from_millis(20)).await;

        let (status, _) = raw_request(addr, "GET /game/get_game_state HTTP/1.0\r\n\r\n").await;
        assert_eq!(status, 503);
    }
}

/// GAMEPLAY TESTS
mod gameplay_tests {
    use super::*;

    /// Tests registration of both colors and rejection of duplicates
    #[tokio::test]
    async fn registration_over_the_wire() {
        let (addr, _handle) = spawn_server(fast_rules()).await;

        let black = command(addr, "register_player black").await;
        assert_eq!(black["status"], "OK");
        assert_eq!(black["player_id"], "player_black");
        assert_eq!(black["color_type"], "black");

        let white = command(addr, "register_player WHITE").await;
        assert_eq!(white["player_id"], "player_white");
        assert_eq!(white["x"], 702);
        assert_eq!(white["y"], 532);

        let taken = command(addr, "register_player black").await;
        assert_eq!(taken["status"], "ERROR");
        assert_eq!(taken["message"], "Color is taken.");
    }

    /// Tests a stage win followed by the delayed advance to stage two
    #[tokio::test]
    async fn stage_win_then_advance() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        command(addr, "register_player black").await;
        command(addr, "register_player white").await;

        win_stage(addr, "player_black", &STAGE_ONE_BLACK_GEMS).await;

        let info = game_info(addr).await;
        assert_eq!(info["stage_winner"], "player_black");
        assert_eq!(info["scores"]["player_black"], 1);
        assert_eq!(info["current_stage"], 1);

        let late = command(addr, "collect_gem player_white white_gem_1").await;
        assert_eq!(late["message"], "Stage has already been won.");

        sleep(SETTLE).await;
        let state = command(addr, "get_game_state").await;
        let info = &state["game_info"];
        assert_eq!(info["current_stage"], 2);
        assert!(info["stage_winner"].is_null());
        assert_eq!(info["required_gems"]["black"], 4);
        assert_eq!(state["hazards"].as_array().unwrap().len(), 2);
        assert_eq!(state["players"]["player_black"]["gems_collected"], 0);
        assert_eq!(state["players"]["player_black"]["x"], 40);
    }

    /// Tests elimination on hazards awarding the stage to the opponent
    #[tokio::test]
    async fn hazard_elimination_awards_stage() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        command(addr, "register_player black").await;
        command(addr, "register_player white").await;
        win_stage(addr, "player_white", &["white_gem_1", "white_gem_3"]).await;
        sleep(SETTLE).await;
        assert_eq!(game_info(addr).await["current_stage"], 2);

        for remaining in (0..3).rev() {
            let hit = command(addr, "check_hazard_collision player_white black_pool_1").await;
            assert_eq!(hit["status"], "OK");

            let dead_again = command(addr, "check_hazard_collision player_white black_pool_1").await;
            if remaining > 0 {
                assert_eq!(dead_again["message"], "Collision could not be processed.");
                let state = command(addr, "get_game_state").await;
                assert_eq!(state["players"]["player_white"]["lives"], remaining);
                assert_eq!(state["players"]["player_white"]["is_dead"], true);
                sleep(SETTLE).await;
            }
        }

        let info = game_info(addr).await;
        assert_eq!(info["stage_winner"], "player_black");
        assert_eq!(info["scores"]["player_black"], 1);
        assert_eq!(info["scores"]["player_white"], 1);
    }

    /// Tests that a majority of stage wins ends the match early
    #[tokio::test]
    async fn majority_ends_match() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        command(addr, "register_player black").await;

        win_stage(addr, "player_black", &STAGE_ONE_BLACK_GEMS).await;
        sleep(SETTLE).await;
        win_stage(addr, "player_black", &STAGE_TWO_BLACK_GEMS).await;

        let info = game_info(addr).await;
        assert_eq!(info["match_winner"], "player_black");
        assert_eq!(info["scores"]["player_black"], 2);

        sleep(SETTLE).await;
        let info = game_info(addr).await;
        assert_eq!(info["current_stage"], 2, "no advance after the match is decided");
        assert_eq!(info["match_winner"], "player_black");
    }

    /// Tests that a reset clears players and scores
    #[tokio::test]
    async fn reset_game_over_the_wire() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        command(addr, "register_player black").await;
        win_stage(addr, "player_black", &STAGE_ONE_BLACK_GEMS).await;

        let reset = command(addr, "reset_game").await;
        assert_eq!(reset["status"], "OK");

        let state = command(addr, "get_game_state").await;
        assert!(state["players"].as_object().unwrap().is_empty());
        assert_eq!(state["game_info"]["scores"]["player_black"], 0);
        assert!(state["game_info"]["stage_winner"].is_null());
        assert_eq!(
            command(addr, "register_player black").await["status"],
            "OK"
        );
    }

    /// Tests that reported telemetry is reflected in snapshots
    #[tokio::test]
    async fn telemetry_is_stored_as_reported() {
        let (addr, _handle) = spawn_server(fast_rules()).await;
        command(addr, "register_player white").await;

        let ack = command(addr, "set_player_state player_white 123 -4 7").await;
        assert_eq!(ack["status"], "OK");

        let player = command(addr, "get_game_state").await["players"]["player_white"].clone();
        assert_eq!(player["x"], 123);
        assert_eq!(player["y"], -4);
        assert_eq!(player["lives"], 7);

        let missing = command(addr, "set_player_state player_black 1 2 3").await;
        assert_eq!(missing["message"], "Player not found.");
    }
}
