//! Trajectory streaming against an in-process simulated controller.
//!
//! Run with:
//!   cargo run --example trajectory-stream
//!
//! The controller thread answers each trajectory point request with SUCCESS.
//! The client brackets the points with the streaming start and end sentinels.

use std::thread;

use smplmsg::connection::{connect, MessageListener};
use smplmsg::message::{comm_type, reply_code, SimpleMessage};
use smplmsg::payload::{JointData, JointTrajPt, SpecialSeqValue, TypedMessage};

const POINTS: u32 = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let listener = MessageListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr();
    eprintln!("Controller listening on {addr}");

    let controller = thread::spawn(
        move || -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let mut conn = listener.accept()?;
            loop {
                let request = conn.receive()?;
                let point = JointTrajPt::from_message(&request)?;
                match point.special_sequence() {
                    Some(special) => eprintln!("[controller] {special:?}"),
                    None => eprintln!(
                        "[controller] point {} j0={:.3} v={} d={}",
                        point.sequence(),
                        point.joint_position().joint(0),
                        point.velocity(),
                        point.duration()
                    ),
                }

                if request.comm_type() == comm_type::SERVICE_REQUEST {
                    conn.send_msg(&point.to_reply(reply_code::SUCCESS)?)?;
                }
                if point.special_sequence() == Some(SpecialSeqValue::EndTrajectory) {
                    return Ok(());
                }
            }
        },
    );

    let mut conn = connect(addr)?;
    let mut reply = SimpleMessage::new();

    let mut start = JointTrajPt::default();
    start.set_special_sequence(SpecialSeqValue::StartTrajectoryStreaming);
    conn.send_and_receive_msg(&start.to_request()?, &mut reply, false)?;

    for seq in 0..POINTS {
        let mut position = JointData::new();
        for joint in 0..6 {
            position.set_joint(joint, seq as f32 * 0.1 + joint as f32 * 0.01)?;
        }
        let point = JointTrajPt::new(seq, position, 0.5, 0.2);
        conn.send_and_receive_msg(&point.to_request()?, &mut reply, true)?;
        eprintln!(
            "[client] point {seq} -> {}",
            reply_code::name(reply.reply_code())
        );
    }

    let mut end = JointTrajPt::default();
    end.set_special_sequence(SpecialSeqValue::EndTrajectory);
    conn.send_and_receive_msg(&end.to_request()?, &mut reply, false)?;

    controller
        .join()
        .map_err(|_| "controller thread panicked")?
        .map_err(|err| err.to_string())?;
    Ok(())
}
