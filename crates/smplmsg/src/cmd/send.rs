use smplmsg_connection::{connect_with_config, ConnectionConfig};
use smplmsg_message::{reply_code, SimpleMessage};
use smplmsg_payload::{JointData, JointTrajPt, Ping, RobotStatus, TypedMessage};

use crate::cmd::{parse_duration, MessageKind, SendArgs};
use crate::exit::{connection_error, payload_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let connect_timeout = parse_duration(&args.connect_timeout)?;
    let message = build_message(&args)?;

    let config = ConnectionConfig {
        read_timeout: Some(wait_timeout),
        write_timeout: Some(wait_timeout),
        ..ConnectionConfig::default()
    };
    let mut conn = connect_with_config(args.addr.as_str(), config, Some(connect_timeout))
        .map_err(|err| connection_error("connect failed", err))?;

    if !args.request {
        conn.send_msg(&message)
            .map_err(|err| connection_error("send failed", err))?;
        tracing::info!(
            message_type = message.message_type(),
            size = message.payload_length(),
            "sent topic"
        );
        return Ok(SUCCESS);
    }

    let mut reply = SimpleMessage::new();
    conn.send_and_receive_msg(&message, &mut reply, true)
        .map_err(|err| connection_error("request failed", err))?;

    let peer = conn
        .get_ref()
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| args.addr.clone());
    print_message(&reply, &peer, format);

    if reply.reply_code() == reply_code::SUCCESS {
        Ok(SUCCESS)
    } else {
        Ok(FAILURE)
    }
}

fn build_message(args: &SendArgs) -> CliResult<SimpleMessage> {
    match args.kind {
        MessageKind::Ping => wrap(&Ping, args.request),
        MessageKind::Joint => wrap(&joint_data(&args.joints)?, args.request),
        MessageKind::TrajPt => {
            let mut point = JointTrajPt::new(
                args.sequence,
                joint_data(&args.joints)?,
                args.velocity,
                args.duration,
            );
            if let Some(special) = args.special {
                point.set_special_sequence(special.into());
            }
            wrap(&point, args.request)
        }
        MessageKind::Status => {
            let status = RobotStatus::with_fields(
                args.drives_powered.into(),
                args.e_stopped.into(),
                args.error_code,
                args.in_error.into(),
                args.in_motion.into(),
                args.mode.into(),
                args.motion_possible.into(),
            );
            wrap(&status, args.request)
        }
    }
}

fn joint_data(values: &[f32]) -> CliResult<JointData> {
    let mut joints = JointData::new();
    for (index, value) in values.iter().enumerate() {
        joints
            .set_joint(index, *value)
            .map_err(|err| payload_error("invalid --joints", err))?;
    }
    Ok(joints)
}

fn wrap<M: TypedMessage>(payload: &M, request: bool) -> CliResult<SimpleMessage> {
    let message = if request {
        payload.to_request()
    } else {
        payload.to_topic()
    };
    message.map_err(|err| payload_error("building message failed", err))
}
