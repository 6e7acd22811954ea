//! Request router
//!
//! Serves one accepted connection: read once, classify the request line,
//! apply the effect, respond and close. The socket is always closed before
//! returning, whatever happened on the wire.

use heapless::String;
use kairos_hal::{MatrixSink, NetError, TcpServer};

use crate::config::{MAX_MESSAGE_LEN, READ_TIMEOUT_MS, REQUEST_BUFFER_SIZE, SCROLL_SPEED_MS};
use crate::display::DisplayController;
use crate::fmt::{debug, info};
use crate::http::{
    decode_spaces, write_html_head, write_redirect, write_status_page, Method, Request,
    HEAD_CAPACITY, PAGE_CAPACITY,
};
use crate::time::LocalTime;

/// Path that scrolls a message
pub const MESSAGE_PATH: &str = "/msg";

/// Path that scrolls today's date
pub const SHOW_DATE_PATH: &str = "/show_date";

/// What a request asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Scroll the decoded text; empty means redirect only
    Message(String<MAX_MESSAGE_LEN>),
    /// Scroll the local date
    ShowDate,
    /// Serve the status page
    Status,
}

/// [`Route`] without its payload, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouteKind {
    Message,
    ShowDate,
    Status,
}

impl Route {
    /// Classify a tokenized request; `None` (unparsable) gets the status page
    pub fn classify(request: Option<&Request<'_>>) -> Self {
        let Some(request) = request else {
            return Route::Status;
        };
        if request.method != Method::Get {
            return Route::Status;
        }
        match request.path {
            MESSAGE_PATH => match request.query_param("text") {
                Some(raw) => Route::Message(decode_spaces(raw)),
                None => Route::Status,
            },
            SHOW_DATE_PATH => Route::ShowDate,
            _ => Route::Status,
        }
    }

    pub fn kind(&self) -> RouteKind {
        match self {
            Route::Message(_) => RouteKind::Message,
            Route::ShowDate => RouteKind::ShowDate,
            Route::Status => RouteKind::Status,
        }
    }
}

/// Connection handler with its receive buffer
pub struct RequestRouter {
    buffer: [u8; REQUEST_BUFFER_SIZE],
}

impl Default for RequestRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestRouter {
    pub const fn new() -> Self {
        Self {
            buffer: [0; REQUEST_BUFFER_SIZE],
        }
    }

    /// Handle the connection `server` has just accepted
    ///
    /// `local` is the tick's local time, used for the date scroll and the
    /// status page. Scrolls start at `now_ms`.
    pub async fn serve<T, M>(
        &mut self,
        server: &mut T,
        local: &LocalTime,
        display: &mut DisplayController<M>,
        now_ms: u64,
    ) -> Result<RouteKind, NetError>
    where
        T: TcpServer,
        M: MatrixSink,
    {
        let result = self.respond(server, local, display, now_ms).await;
        server.close().await;
        result
    }

    async fn respond<T, M>(
        &mut self,
        server: &mut T,
        local: &LocalTime,
        display: &mut DisplayController<M>,
        now_ms: u64,
    ) -> Result<RouteKind, NetError>
    where
        T: TcpServer,
        M: MatrixSink,
    {
        let len = server.read(&mut self.buffer, READ_TIMEOUT_MS).await?;
        let request = core::str::from_utf8(&self.buffer[..len])
            .ok()
            .and_then(Request::parse);
        let route = Route::classify(request.as_ref());
        let kind = route.kind();

        let mut head: String<HEAD_CAPACITY> = String::new();
        match route {
            Route::Message(text) => {
                if text.is_empty() {
                    debug!("empty message ignored");
                } else {
                    info!("scrolling message ({} bytes)", text.len());
                    display.start_scroll(&text, SCROLL_SPEED_MS, now_ms);
                }
                let _ = write_redirect(&mut head, "/");
                server.write_all(head.as_bytes()).await?;
            }
            Route::ShowDate => {
                info!("scrolling date");
                display.start_scroll(&local.date_label(), SCROLL_SPEED_MS, now_ms);
                let _ = write_redirect(&mut head, "/");
                server.write_all(head.as_bytes()).await?;
            }
            Route::Status => {
                let mut page: String<PAGE_CAPACITY> = String::new();
                let _ = write_status_page(&mut page, &local.clock_label(), &local.date_label());
                let _ = write_html_head(&mut head, page.len());
                server.write_all(head.as_bytes()).await?;
                server.write_all(page.as_bytes()).await?;
            }
        }
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSink, ScriptedServer};
    use crate::time::local_time;
    use embassy_futures::block_on;

    // 2024-01-05 10:30 UTC, 12:30 local
    const FRIDAY_NOON: u64 = 1_704_450_600;

    fn serve_one(server: &mut ScriptedServer, display: &mut DisplayController<RecordingSink>) -> Result<RouteKind, NetError> {
        let mut router = RequestRouter::new();
        block_on(async {
            server.accept(50).await?;
            router.serve(server, &local_time(FRIDAY_NOON), display, 0).await
        })
    }

    /// Advance the scroll until `text` sits flush left and compare the panel
    fn scrolls_to_left_edge(display: &mut DisplayController<RecordingSink>, text: &str) -> bool {
        let mut expected = crate::display::Frame::new();
        expected.draw_text(text, 0);
        // frames at 32..=0 are drawn at 40 ms spacing
        for step in 0..33 {
            display.advance_scroll(step * 40);
        }
        *display.frame() == expected
    }

    #[test]
    fn test_classify_routes() {
        let msg = Request::parse("GET /msg?text=hello+world%20test HTTP/1.1").unwrap();
        match Route::classify(Some(&msg)) {
            Route::Message(text) => assert_eq!(text.as_str(), "hello world test"),
            other => panic!("unexpected route {:?}", other),
        }

        let date = Request::parse("GET /show_date?x=1 HTTP/1.1").unwrap();
        assert_eq!(Route::classify(Some(&date)), Route::ShowDate);

        for line in [
            "GET / HTTP/1.1",
            "GET /msg HTTP/1.1",
            "GET /msg?other=1 HTTP/1.1",
            "GET /msg?text HTTP/1.1",
            "GET /msgx?text=a HTTP/1.1",
            "GET /show_date/ HTTP/1.1",
            "POST /msg?text=a HTTP/1.1",
        ] {
            let req = Request::parse(line).unwrap();
            assert_eq!(Route::classify(Some(&req)), Route::Status, "{}", line);
        }
        assert_eq!(Route::classify(None), Route::Status);
    }

    #[test]
    fn test_message_redirects_and_scrolls() {
        let mut server = ScriptedServer::new().with_request("GET /msg?text=HI HTTP/1.1\r\n\r\n");
        let mut display = DisplayController::new(RecordingSink::default());

        assert_eq!(serve_one(&mut server, &mut display), Ok(RouteKind::Message));

        let response = server.last_response().unwrap();
        assert!(response.starts_with("HTTP/1.1 302 Found\r\n"));
        assert!(response.contains("Location: /\r\n"));
        assert_eq!(server.closes, 1);
        assert_eq!(server.read_timeouts, [READ_TIMEOUT_MS]);
        assert_eq!(display.scrolling_text(), Some("HI"));
        assert!(scrolls_to_left_edge(&mut display, "HI"));
    }

    #[test]
    fn test_empty_message_redirects_without_scroll() {
        let mut server = ScriptedServer::new().with_request("GET /msg?text= HTTP/1.1\r\n\r\n");
        let mut display = DisplayController::new(RecordingSink::default());

        assert_eq!(serve_one(&mut server, &mut display), Ok(RouteKind::Message));
        assert!(server.last_response().unwrap().contains("302 Found"));
        assert!(!display.is_scrolling());
    }

    #[test]
    fn test_show_date_scrolls_local_date() {
        let mut server = ScriptedServer::new().with_request("GET /show_date HTTP/1.1\r\n\r\n");
        let mut display = DisplayController::new(RecordingSink::default());

        assert_eq!(serve_one(&mut server, &mut display), Ok(RouteKind::ShowDate));
        assert!(server.last_response().unwrap().contains("302 Found"));
        assert_eq!(display.scrolling_text(), Some("05/01/2024"));
        assert!(scrolls_to_left_edge(&mut display, "05/01/2024"));
    }

    #[test]
    fn test_status_page_content_length_matches_body() {
        let mut server = ScriptedServer::new().with_request("GET / HTTP/1.1\r\n\r\n");
        let mut display = DisplayController::new(RecordingSink::default());

        assert_eq!(serve_one(&mut server, &mut display), Ok(RouteKind::Status));

        let response = server.last_response().unwrap();
        let (head, body) = response.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("HTTP/1.1 200 OK"));
        assert!(head.contains("Connection: close"));
        assert!(head.contains(&std::format!("Content-Length: {}", body.len())));
        assert!(body.contains("12:30"));
        assert!(body.contains("05/01/2024"));
        assert!(!display.is_scrolling());
    }

    #[test]
    fn test_invalid_utf8_gets_status_page() {
        let mut server = ScriptedServer::new().with_raw_request(&[0xFF, 0xFE, b' ', b'/']);
        let mut display = DisplayController::new(RecordingSink::default());

        assert_eq!(serve_one(&mut server, &mut display), Ok(RouteKind::Status));
        assert!(server.last_response().unwrap().starts_with("HTTP/1.1 200 OK"));
    }

    #[test]
    fn test_read_error_still_closes() {
        let mut server = ScriptedServer::new().with_read_error(NetError::Timeout);
        let mut display = DisplayController::new(RecordingSink::default());

        assert_eq!(serve_one(&mut server, &mut display), Err(NetError::Timeout));
        assert_eq!(server.closes, 1);
        assert!(server.responses.is_empty());
    }

    #[test]
    fn test_write_error_still_closes() {
        let mut server = ScriptedServer::new().with_request("GET / HTTP/1.1\r\n\r\n");
        server.fail_writes = true;
        let mut display = DisplayController::new(RecordingSink::default());

        assert_eq!(serve_one(&mut server, &mut display), Err(NetError::ConnectionReset));
        assert_eq!(server.closes, 1);
    }
}
