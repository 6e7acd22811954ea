//! Minimal HTTP/1.1 request tokenizing and response encoding
//!
//! Only the request line is inspected. Headers and bodies are ignored, and
//! every response closes the connection.

use core::fmt::{self, Write};

use heapless::String;

/// Capacity for an encoded status line plus headers
pub const HEAD_CAPACITY: usize = 160;

/// Capacity for the rendered status page
pub const PAGE_CAPACITY: usize = 1024;

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Head,
    Post,
    Other,
}

impl Method {
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            _ => Method::Other,
        }
    }
}

/// Request line borrowed from the receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> Request<'a> {
    /// Tokenize the first line of `raw`
    ///
    /// Needs at least `METHOD SP TARGET`; the version token and anything
    /// after it are ignored.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let line = raw.lines().next()?;
        let mut parts = line.split(' ').filter(|part| !part.is_empty());
        let method = Method::from_token(parts.next()?);
        let target = parts.next()?;
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        Some(Self {
            method,
            path,
            query,
        })
    }

    /// Raw value of the first `name` parameter in the query string
    ///
    /// Only `name=value` pairs count; a bare `name` is not a parameter.
    pub fn query_param(&self, name: &str) -> Option<&'a str> {
        self.query?
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find_map(|(key, value)| (key == name).then_some(value))
    }
}

/// Decode `+` and `%20` to spaces, leaving every other byte untouched
///
/// Output stops at the last whole character that fits in `N` bytes.
pub fn decode_spaces<const N: usize>(value: &str) -> String<N> {
    let mut out = String::new();
    let mut rest = value;
    while let Some(c) = rest.chars().next() {
        let (decoded, consumed) = if rest.starts_with("%20") {
            (' ', 3)
        } else if c == '+' {
            (' ', 1)
        } else {
            (c, c.len_utf8())
        };
        if out.push(decoded).is_err() {
            break;
        }
        rest = &rest[consumed..];
    }
    out
}

/// `302 Found` pointing back at `location`
pub fn write_redirect<const N: usize>(out: &mut String<N>, location: &str) -> fmt::Result {
    write!(
        out,
        "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        location
    )
}

/// `200 OK` head for an HTML body of `content_length` bytes
pub fn write_html_head<const N: usize>(out: &mut String<N>, content_length: usize) -> fmt::Result {
    write!(
        out,
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        content_length
    )
}

/// Status page showing the clock and offering the two actions
pub fn write_status_page<const N: usize>(out: &mut String<N>, clock: &str, date: &str) -> fmt::Result {
    write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>Kairos</title></head><body style=\"font-family:sans-serif;text-align:center\">\
<h1>{}</h1><p>{}</p>\
<form action=\"/msg\" method=\"get\"><input name=\"text\" maxlength=\"128\" placeholder=\"Message\">\
<button type=\"submit\">Scroll</button></form>\
<p><a href=\"/show_date\">Show date</a></p></body></html>",
        clock, date
    )
}
