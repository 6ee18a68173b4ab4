mod applier;
pub use applier::*;

mod builder;
pub use builder::*;

mod error;
pub use error::*;

mod factory;
pub use factory::*;

mod request;
pub use request::*;

mod sort;
pub use sort::*;

mod sorter;
pub use sorter::*;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Result as FmtResult;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use derivative::Derivative;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;
use tracing::{trace, warn};
use url::Url;
