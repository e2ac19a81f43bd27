use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;

use crate::client::Device;
use crate::command::http::{self, responses::RequestResult, types::HttpVerb, BODY_LEN};
use crate::command::{Payload, Response};
use crate::display::{DisplayStatus, StatusDisplay};
use crate::error::Error;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8, BODY_LEN>,
}

impl HttpResponse {
    /// Everything from the first `{` on, the body may carry a preamble.
    pub fn json_body(&self) -> Option<&[u8]> {
        let start = self.body.iter().position(|&b| b == b'{')?;
        Some(&self.body[start..])
    }

    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }
}

/// Split `https://host[:port]/path` into the server part for
/// `+SHCONF="URL"` and the request path. The path defaults to `/`.
pub fn split_url(url: &str) -> Result<(&str, &str), Error> {
    let host_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    let (server, path) = match url[host_start..].find('/') {
        Some(i) => url.split_at(host_start + i),
        None => (url, "/"),
    };
    if server.len() == host_start {
        return Err(Error::InvalidCommand);
    }
    Ok((server, path))
}

impl<'a, T, D, PWR> Device<'a, T, D, PWR>
where
    T: Read + ReadReady + Write,
    D: StatusDisplay,
    PWR: OutputPin,
{
    /// POST `body` (urlencoded form data) to `url` and return the response
    /// body lines. An HTTP status above 299 is a failure.
    pub fn send_data_payload(&mut self, url: &str, body: &str) -> Response {
        self.show(DisplayStatus::Sending);

        match self.http_request(url, Some(body), HttpVerb::Post) {
            Ok(response) => {
                self.show(DisplayStatus::Sent);
                let mut payload = Payload::default();
                if let Some(text) = response.body_str() {
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .for_each(|l| payload.push(l));
                }
                Response::Success(payload)
            }
            Err(e) => {
                let state = self.state();
                self.set_state(state);
                e.into()
            }
        }
    }

    /// Full request cycle: data connection, session, request, read back.
    /// The session and the data connection are closed whatever the outcome.
    pub fn http_request(
        &mut self,
        url: &str,
        body: Option<&str>,
        verb: HttpVerb,
    ) -> Result<HttpResponse, Error> {
        let (server, path) = split_url(url)?;
        self.open_data_connection()?;

        let result = self.http_session(server, path, body, verb);

        if let Err(e) = self.close_data_connection() {
            warn!("Failed to close data connection: {:?}", e);
        }
        result
    }

    fn http_session(
        &mut self,
        server: &str,
        path: &str,
        body: Option<&str>,
        verb: HttpVerb,
    ) -> Result<HttpResponse, Error> {
        self.start_session(server)?;
        debug!("HTTP session open");

        let result = self.http_transfer(path, body, verb);

        match self.send(&http::disconnect()?).into_result() {
            Ok(_) => debug!("HTTP session closed"),
            Err(e) => warn!("Failed to close HTTP session: {:?}", e),
        }
        result
    }

    fn start_session(&mut self, server: &str) -> Result<(), Error> {
        let payload = self.send(&http::session_state()?).into_result()?;
        if http::responses::session_connected(&payload).unwrap_or(false) {
            info!("Closing existing HTTP session");
            self.send(&http::disconnect()?).into_result()?;
        }

        self.send(&http::set_url(server)?).into_result()?;
        let cmd = http::connect(self.config.http_timeout)?;
        self.send(&cmd).into_result()?;
        Ok(())
    }

    /// The fixed request headers survive across sessions, so they are only
    /// sent once per configuration.
    fn set_request_headers(&mut self) -> Result<(), Error> {
        if self.headers_set {
            return Ok(());
        }
        self.send(&http::clear_headers()?).into_result()?;
        self.send(&http::content_headers()?).into_result()?;
        self.send(&http::connection_headers()?).into_result()?;
        self.headers_set = true;
        Ok(())
    }

    fn http_transfer(
        &mut self,
        path: &str,
        body: Option<&str>,
        verb: HttpVerb,
    ) -> Result<HttpResponse, Error> {
        self.set_request_headers()?;
        if let Some(body) = body {
            self.send(&http::set_body(body)?).into_result()?;
        }

        debug!("HTTP {} {}", verb.as_str(), path);
        let cmd = http::request(path, verb, self.config.http_timeout)?;
        let payload = self.send(&cmd).into_result()?;
        let result = RequestResult::parse(&payload)?;
        if !result.is_success() {
            warn!("HTTP status {}", result.status);
            return Err(Error::Http(result.status));
        }

        let mut response = HttpResponse {
            status: result.status,
            body: Vec::new(),
        };
        if result.length == 0 {
            return Ok(response);
        }

        if result.length > BODY_LEN {
            warn!("Response body of {} bytes truncated", result.length);
        }
        let length = result.length.min(BODY_LEN);
        let cmd = http::read(length, self.config.read_timeout)?;
        self.send(&cmd).into_result()?;

        response
            .body
            .resize_default(length)
            .map_err(|_| Error::Overflow)?;
        let read = self.channel.read_bytes(&mut response.body, self.config.read_timeout);
        response.body.truncate(read);
        Ok(response)
    }
}
