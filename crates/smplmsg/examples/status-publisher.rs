//! Publish robot status and joint position topics to a listening client.
//!
//! Run with:
//!   cargo run --features cli -- listen 127.0.0.1:11002 --format pretty
//!
//! In another terminal:
//!   cargo run --example status-publisher -- 127.0.0.1:11002

use std::thread;
use std::time::Duration;

use smplmsg::connection::{connect, ports};
use smplmsg::payload::{JointData, RobotMode, RobotStatus, TriState, TypedMessage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| format!("127.0.0.1:{}", ports::STATE));

    let mut conn = connect(addr.as_str())?;
    eprintln!("Publishing to {addr}");

    let mut status = RobotStatus::new();
    status.set_drives_powered(TriState::ON);
    status.set_e_stopped(TriState::OFF);
    status.set_in_error(TriState::FALSE);
    status.set_mode(RobotMode::AUTO);
    status.set_motion_possible(TriState::TRUE);

    for tick in 0..10u16 {
        status.set_in_motion(TriState::from(tick % 2 == 1));
        conn.send_msg(&status.to_topic()?)?;

        let mut position = JointData::new();
        position.set_joint(0, f32::from(tick) * 0.05)?;
        let mut topic = position.to_topic()?;
        topic.set_sequence(tick);
        conn.send_msg(&topic)?;

        thread::sleep(Duration::from_millis(100));
    }

    Ok(())
}
