use armlink_core::{Observation, Transport};
use armlink_tcp::{encode_frame, FrameDecoder, TcpTransport, TcpTransportConfig};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

const DEADLINE: Duration = Duration::from_secs(5);

fn loopback_config() -> TcpTransportConfig {
    TcpTransportConfig::default().bind_addr("127.0.0.1").port(0)
}

fn observation() -> Observation {
    Observation {
        joint_angles: vec![0.0; 6],
        tcp_position: [0.0, 0.5, 0.0],
        direction_to_target: [0.0; 3],
        distance_to_target: 0.0,
        gripper_state: 1.0,
        is_gripping: false,
        laser_hit: false,
        laser_distance: 1.0,
        collision_detected: false,
        target_orientation_one_hot: [1.0, 0.0],
        is_reset_frame: true,
        joint_angle_limits: Some(vec![(-90.0, 90.0); 6]),
    }
}

fn recv_command(transport: &mut TcpTransport) -> armlink_core::Command {
    let start = Instant::now();
    loop {
        if let Some(cmd) = transport.try_recv() {
            return cmd;
        }
        assert!(start.elapsed() < DEADLINE, "no command within deadline");
        thread::sleep(Duration::from_millis(5));
    }
}

fn recv_frame(client: &mut TcpStream) -> Vec<u8> {
    let mut decoder = FrameDecoder::new();
    let mut chunk = [0u8; 1024];
    let start = Instant::now();
    loop {
        if let Some(frame) = decoder.next_frame().unwrap() {
            return frame;
        }
        assert!(start.elapsed() < DEADLINE, "no frame within deadline");
        match client.read(&mut chunk) {
            Ok(0) => panic!("server closed the connection"),
            Ok(n) => decoder.extend(&chunk[..n]),
            Err(ref e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                thread::sleep(Duration::from_millis(5));
            }
            Err(e) => panic!("read failed: {}", e),
        }
    }
}

#[test]
fn test_command_and_observation_roundtrip() {
    let mut transport = TcpTransport::bind(&loopback_config()).unwrap();
    let addr = transport.local_addr();

    let mut client = TcpStream::connect(addr).unwrap();
    client
        .set_read_timeout(Some(Duration::from_millis(20)))
        .unwrap();
    client
        .write_all(&encode_frame(br#"{"kind":1}"#))
        .unwrap();

    let cmd = recv_command(&mut transport);
    assert_eq!(cmd.kind, 1);

    // The client is attached once its command has been decoded.
    transport.send_observation(&observation()).unwrap();
    let frame = recv_frame(&mut client);
    let obs: Observation = serde_json::from_slice(&frame).unwrap();
    assert!(obs.is_reset_frame);
    assert_eq!(obs.joint_angle_limits, Some(vec![(-90.0, 90.0); 6]));

    transport.send_response(r#"{"status":"ok"}"#).unwrap();
    let frame = recv_frame(&mut client);
    assert_eq!(frame, br#"{"status":"ok"}"#.to_vec());

    transport.shutdown();
}

#[test]
fn test_malformed_command_is_skipped() {
    let mut transport = TcpTransport::bind(&loopback_config()).unwrap();
    let addr = transport.local_addr();

    let mut client = TcpStream::connect(addr).unwrap();
    client.write_all(&encode_frame(b"not json")).unwrap();
    client.write_all(&encode_frame(br#"{"kind":2}"#)).unwrap();

    // The malformed frame is logged and dropped; the next one survives.
    let cmd = recv_command(&mut transport);
    assert_eq!(cmd.kind, 2);

    transport.shutdown();
}

#[test]
fn test_send_without_client_fails_nonfatally() {
    let mut transport = TcpTransport::bind(&loopback_config()).unwrap();
    assert!(!transport.is_connected());
    assert!(transport.send_observation(&observation()).is_err());
    assert!(transport.send_response("{}").is_err());
    transport.shutdown();
}

#[test]
fn test_commands_are_delivered_in_order() {
    let mut transport = TcpTransport::bind(&loopback_config()).unwrap();
    let addr = transport.local_addr();

    let mut client = TcpStream::connect(addr).unwrap();
    let mut burst = Vec::new();
    for i in 0..4u8 {
        burst.extend_from_slice(&encode_frame(
            format!(r#"{{"kind":0,"actions":[{}]}}"#, i).as_bytes(),
        ));
    }
    client.write_all(&burst).unwrap();

    for i in 0..4 {
        let cmd = recv_command(&mut transport);
        assert_eq!(cmd.actions, vec![i as f32]);
    }

    transport.shutdown();
}
