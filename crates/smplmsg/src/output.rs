use std::fmt::Write as _;
use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::{json, Value};
use smplmsg_message::{comm_type, msg_type, msg_type_name, reply_code, SimpleMessage};
use smplmsg_payload::{JointData, JointTrajPt, Ping, RobotStatus, TypedMessage};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    schema_id: &'a str,
    message_type: u16,
    message_type_name: &'a str,
    comm_type: u8,
    comm_type_name: &'a str,
    reply_code: u8,
    reply_code_name: &'a str,
    version: String,
    sequence: u16,
    stamp_sec: u32,
    stamp_nsec: u32,
    payload_length: u32,
    payload_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    decoded: Option<Value>,
    peer: &'a str,
    timestamp: String,
}

pub fn print_message(message: &SimpleMessage, peer: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                schema_id: "https://schemas.3leaps.dev/smplmsg/cli/v1/message-received.schema.json",
                message_type: message.message_type(),
                message_type_name: msg_type_name(message.message_type()),
                comm_type: message.comm_type(),
                comm_type_name: comm_type::name(message.comm_type()),
                reply_code: message.reply_code(),
                reply_code_name: reply_code::name(message.reply_code()),
                version: format!("{}.{}", message.version_major(), message.version_minor()),
                sequence: message.sequence(),
                stamp_sec: message.timestamp_sec(),
                stamp_nsec: message.timestamp_nsec(),
                payload_length: message.payload_length(),
                payload_hex: hex(message.data().as_slice()),
                decoded: decode_payload(message),
                peer,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "COMM", "REPLY", "SEQ", "SIZE", "PEER", "PAYLOAD"])
                .add_row(vec![
                    msg_type_name(message.message_type()).to_string(),
                    comm_type::name(message.comm_type()).to_string(),
                    reply_code::name(message.reply_code()).to_string(),
                    message.sequence().to_string(),
                    message.payload_length().to_string(),
                    peer.to_string(),
                    payload_preview(message),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} ({}) comm={} reply={} seq={} size={} peer={} payload={}",
                message.message_type(),
                msg_type_name(message.message_type()),
                comm_type::name(message.comm_type()),
                reply_code::name(message.reply_code()),
                message.sequence(),
                message.payload_length(),
                peer,
                payload_preview(message)
            );
        }
    }
}

/// Decode the payload of the standard message types the CLI knows.
pub fn decode_payload(message: &SimpleMessage) -> Option<Value> {
    match message.message_type() {
        msg_type::PING => Ping::from_message(message).ok().map(|_| json!({})),
        msg_type::JOINT_POSITION => JointData::from_message(message)
            .ok()
            .map(|joints| json!({ "joints": joints.joints() })),
        msg_type::JOINT_TRAJ_PT => JointTrajPt::from_message(message).ok().map(|point| {
            json!({
                "sequence": point.sequence(),
                "special": point.special_sequence().map(|s| format!("{s:?}")),
                "joints": point.joint_position().joints(),
                "velocity": point.velocity(),
                "duration": point.duration(),
            })
        }),
        msg_type::STATUS => RobotStatus::from_message(message).ok().map(|status| {
            json!({
                "drives_powered": status.drives_powered().to_string(),
                "e_stopped": status.e_stopped().to_string(),
                "error_code": status.error_code(),
                "in_error": status.in_error().to_string(),
                "in_motion": status.in_motion().to_string(),
                "mode": status.mode().to_string(),
                "motion_possible": status.motion_possible().to_string(),
            })
        }),
        _ => None,
    }
}

fn payload_preview(message: &SimpleMessage) -> String {
    match decode_payload(message) {
        Some(value) => value.to_string(),
        None if message.data().is_empty() => "<empty>".to_string(),
        None => format!("<{} bytes> {}", message.data().len(), hex(message.data().as_slice())),
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
