use smplmsg_connection::MessageListener;
use smplmsg_message::{comm_type, msg_type_name, reply_code, SimpleMessage};

use crate::cmd::listen::peer_label;
use crate::cmd::{end_of_session, ServeArgs, Shutdown};
use crate::exit::{connection_error, message_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    let shutdown = Shutdown::install()?;
    let listener = MessageListener::bind(args.addr.as_str())
        .map_err(|err| connection_error("bind failed", err))?;
    let reply = if args.fail {
        reply_code::FAILURE
    } else {
        reply_code::SUCCESS
    };

    let mut handled = 0usize;

    loop {
        let mut conn = listener
            .accept()
            .map_err(|err| connection_error("accept failed", err))?;
        let peer = peer_label(&conn);
        tracing::info!(%peer, "controller session started");

        loop {
            let message = match conn.receive() {
                Ok(message) => message,
                Err(err) => {
                    end_of_session(err)?;
                    break;
                }
            };

            let _handling = shutdown.handling();

            if message.comm_type() == comm_type::SERVICE_REQUEST {
                let response = reply_to(&message, reply)?;
                tracing::info!(
                    message_type = message.message_type(),
                    message_type_name = msg_type_name(message.message_type()),
                    reply_code = reply_code::name(reply),
                    size = message.payload_length(),
                    "answering service request"
                );
                conn.send_msg(&response)
                    .map_err(|err| connection_error("reply send failed", err))?;
            } else {
                print_message(&message, &peer, format);
            }

            handled = handled.saturating_add(1);
            if let Some(count) = args.count {
                if handled >= count {
                    return Ok(SUCCESS);
                }
            }
        }
    }
}

/// Reply to `request` with the same type and sequence, echoing its payload.
fn reply_to(request: &SimpleMessage, reply: u8) -> CliResult<SimpleMessage> {
    let mut response = SimpleMessage::new();
    response
        .init(
            request.message_type(),
            request.version_major(),
            request.version_minor(),
            comm_type::SERVICE_REPLY,
            reply,
            request.data(),
        )
        .map_err(|err| message_error("building reply failed", err))?;
    response.set_sequence(request.sequence());
    Ok(response)
}
