//! Line codec for requests and responses.
//!
//! Lines are split on single spaces. Consecutive spaces produce empty
//! tokens, so `"CALCULO a  b"` carries three parameters, the middle one empty.

use std::fmt;

use thiserror::Error;

/// Errors produced when decoding a response line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The first token is neither `OK` nor `NOK`.
    #[error("unknown response status: {0:?}")]
    UnknownStatus(String),
}

/// A decoded request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    command: String,
    parameters: Vec<String>,
}

impl Request {
    /// Build a request; the command is normalized to uppercase.
    pub fn new<C, I, P>(command: C, parameters: I) -> Self
    where
        C: AsRef<str>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            command: command.as_ref().to_uppercase(),
            parameters: parameters.into_iter().map(Into::into).collect(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Render the request as it travels on the wire, without terminator.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;
        for param in &self.parameters {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}

/// Outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Nok,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Nok => "NOK",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(Status::Ok),
            "NOK" => Ok(Status::Nok),
            other => Err(CodecError::UnknownStatus(other.to_string())),
        }
    }
}

/// A response produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    message: String,
}

impl Response {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Status::Ok, message)
    }

    pub fn nok(message: impl Into<String>) -> Self {
        Self::new(Status::Nok, message)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(self.status.as_str())
        } else {
            write!(f, "{} {}", self.status, self.message)
        }
    }
}

/// Drop a single trailing `\n` or `\r\n`.
fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Decode a request line. Never fails: an empty line yields an empty command.
pub fn decode(line: &str) -> Request {
    let mut tokens = strip_terminator(line).split(' ');
    let command = tokens.next().unwrap_or_default().to_uppercase();

    Request {
        command,
        parameters: tokens.map(str::to_string).collect(),
    }
}

/// Encode a response line, without terminator.
pub fn encode(response: &Response) -> String {
    response.to_string()
}

/// Decode a response line written by [`encode`].
pub fn decode_response(line: &str) -> Result<Response, CodecError> {
    let line = strip_terminator(line);
    let (status, message) = line.split_once(' ').unwrap_or((line, ""));

    Ok(Response {
        status: status.parse()?,
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_uppercases_command_and_keeps_parameter_order() {
        let req = decode("calculo x y ABC1234");
        assert_eq!(req.command(), "CALCULO");
        assert_eq!(req.parameters(), ["x", "y", "ABC1234"]);
    }

    #[test]
    fn decode_strips_line_terminators() {
        assert_eq!(decode("contador\n").command(), "CONTADOR");
        let req = decode("ingreso root admin20\r\n");
        assert_eq!(req.parameters(), ["root", "admin20"]);
    }

    #[test]
    fn decode_empty_line() {
        let req = decode("");
        assert_eq!(req.command(), "");
        assert!(req.parameters().is_empty());
    }

    #[test]
    fn decode_keeps_empty_tokens_between_spaces() {
        let req = decode("CALCULO a  b");
        assert_eq!(req.parameters(), ["a", "", "b"]);
    }

    #[test]
    fn parameters_are_case_preserved() {
        let req = decode("ingreso Root Admin20");
        assert_eq!(req.parameters(), ["Root", "Admin20"]);
    }

    #[test]
    fn request_line_round_trip() {
        let req = Request::new("calculo", ["p1", "p2", "XYZ9870"]);
        assert_eq!(req.to_line(), "CALCULO p1 p2 XYZ9870");
        assert_eq!(decode(&req.to_line()), req);

        let bare = Request::new("Contador", Vec::<String>::new());
        assert_eq!(bare.to_line(), "CONTADOR");
        assert_eq!(decode(&bare.to_line()), bare);
    }

    #[test]
    fn encode_joins_status_and_message() {
        assert_eq!(encode(&Response::ok("ABC1234 16")), "OK ABC1234 16");
        assert_eq!(
            encode(&Response::nok("Placa no válida")),
            "NOK Placa no válida"
        );
    }

    #[test]
    fn decode_response_keeps_spaces_in_message() {
        let resp = decode_response("NOK No hay solicitudes previas\n").unwrap();
        assert_eq!(resp.status(), Status::Nok);
        assert_eq!(resp.message(), "No hay solicitudes previas");
    }

    #[test]
    fn decode_response_inverts_encode() {
        let resp = Response::ok("ABC1234 16");
        assert_eq!(decode_response(&encode(&resp)).unwrap(), resp);
    }

    #[test]
    fn decode_response_rejects_unknown_status() {
        assert_eq!(
            decode_response("MAYBE something"),
            Err(CodecError::UnknownStatus("MAYBE".into()))
        );
    }
}
