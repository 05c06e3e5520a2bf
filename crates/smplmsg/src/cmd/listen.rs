use smplmsg_connection::{MessageConnection, MessageListener};
use smplmsg_transport::RobotStream;

use crate::cmd::{end_of_session, ListenArgs, Shutdown};
use crate::exit::{connection_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let shutdown = Shutdown::install()?;
    let listener = MessageListener::bind(args.addr.as_str())
        .map_err(|err| connection_error("bind failed", err))?;

    let mut printed = 0usize;

    loop {
        let mut conn = listener
            .accept()
            .map_err(|err| connection_error("accept failed", err))?;
        let peer = peer_label(&conn);

        loop {
            let message = match conn.receive() {
                Ok(message) => message,
                Err(err) => {
                    end_of_session(err)?;
                    break;
                }
            };

            let _handling = shutdown.handling();
            print_message(&message, &peer, format);
            printed = printed.saturating_add(1);

            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }
        }
    }
}

pub(crate) fn peer_label(conn: &MessageConnection<RobotStream>) -> String {
    conn.get_ref()
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
