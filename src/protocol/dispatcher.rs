//! Command dispatch.
//!
//! Every request maps to exactly one [`Response`]. Malformed input never
//! escapes as an error; it is answered with a `NOK` line.

use rand::Rng;

use crate::protocol::codec::{Request, Response};
use crate::protocol::counters::ClientCounters;
use crate::protocol::plate::Plate;

pub const MSG_UNKNOWN_COMMAND: &str = "Comando no reconocido";
pub const MSG_ACCESS_GRANTED: &str = "ACCESO_CONCEDIDO";
pub const MSG_ACCESS_DENIED: &str = "ACCESO_NEGADO";
pub const MSG_INVALID_PLATE: &str = "Placa no válida";
pub const MSG_NO_PREVIOUS_REQUESTS: &str = "No hay solicitudes previas";

const ADMIN_USER: &str = "root";
const ADMIN_PASSWORD: &str = "admin20";

/// Commands understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `INGRESO user password`
    Login,
    /// `CALCULO _ _ plate`
    Calculate,
    /// `CONTADOR`
    Count,
}

impl Command {
    /// Resolve an already-uppercased command name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "INGRESO" => Some(Command::Login),
            "CALCULO" => Some(Command::Calculate),
            "CONTADOR" => Some(Command::Count),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Login => "INGRESO",
            Command::Calculate => "CALCULO",
            Command::Count => "CONTADOR",
        }
    }
}

/// Source of the login outcome for correct credentials.
///
/// Correct credentials are granted only half of the time.
pub trait AccessCoin: Send + Sync {
    /// `true` grants access.
    fn flip(&self) -> bool;
}

/// Fair coin backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCoin;

impl AccessCoin for RandomCoin {
    fn flip(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Coin that always lands the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub bool);

impl AccessCoin for FixedCoin {
    fn flip(&self) -> bool {
        self.0
    }
}

/// Executes requests against the shared client counters.
#[derive(Debug, Clone)]
pub struct Dispatcher<C = RandomCoin> {
    counters: ClientCounters,
    coin: C,
}

impl Dispatcher<RandomCoin> {
    pub fn new(counters: ClientCounters) -> Self {
        Self::with_coin(counters, RandomCoin)
    }
}

impl<C: AccessCoin> Dispatcher<C> {
    pub fn with_coin(counters: ClientCounters, coin: C) -> Self {
        Self { counters, coin }
    }

    pub fn counters(&self) -> &ClientCounters {
        &self.counters
    }

    /// Execute `request` on behalf of `client`.
    pub fn dispatch(&self, request: &Request, client: &str) -> Response {
        let params = request.parameters();

        match Command::from_name(request.command()) {
            Some(Command::Login) => self.login(params),
            Some(Command::Calculate) => self.calculate(params, client),
            Some(Command::Count) => self.count(client),
            None => Response::nok(MSG_UNKNOWN_COMMAND),
        }
    }

    fn login(&self, params: &[String]) -> Response {
        match params {
            [user, password] if user == ADMIN_USER && password == ADMIN_PASSWORD => {
                if self.coin.flip() {
                    Response::ok(MSG_ACCESS_GRANTED)
                } else {
                    Response::nok(MSG_ACCESS_DENIED)
                }
            }
            _ => Response::nok(MSG_ACCESS_DENIED),
        }
    }

    fn calculate(&self, params: &[String], client: &str) -> Response {
        // The first two slots are required but carry no meaning.
        let [_, _, raw_plate] = params else {
            return Response::nok(MSG_UNKNOWN_COMMAND);
        };

        let Some(plate) = Plate::parse(raw_plate) else {
            return Response::nok(MSG_INVALID_PLATE);
        };

        let indicator = plate.day_indicator();
        let count = self.counters.increment(client);
        tracing::trace!(
            client,
            plate = %plate,
            weekday = ?indicator.weekday(),
            count,
            "Plate restriction computed"
        );

        Response::ok(format!("{} {}", plate, indicator))
    }

    fn count(&self, client: &str) -> Response {
        match self.counters.get(client) {
            Some(count) => Response::ok(count.to_string()),
            None => Response::nok(MSG_NO_PREVIOUS_REQUESTS),
        }
    }
}
