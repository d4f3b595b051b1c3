pub mod protocol {
    use crate::model::Host;
    use crate::remote::RemoteError;
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use std::io::{BufRead, Write};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "request", rename_all = "snake_case")]
    pub enum Request {
        List,
        Lookup { name: String },
        Call { service: String, call: Call },
        Listen { service: String, root: String, client: String },
    }
    ///
    /// One operation on a bound service.  The first three are the
    /// RemoteService operations every service answers; the rest are
    /// MasterService operations.
    ///
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "op", rename_all = "snake_case")]
    pub enum Call {
        Subscribe { root: String, client: String },
        IsAvailable,
        IsRegistered { root: String, client: String },
        GetDestinationCaches,
        GetDestinationSchedulerCache { name: String },
        RestartDestination { name: String, graceful: bool },
        UpdateHost { host: Host },
        RemoveDestination { name: String },
        GetDestination { name: String },
        GetAssociation { destination: String, host: String },
        GetUser { name: String },
        GetBadDataTransfersCount { destination: String },
        GetCatUrls,
        GetTransferGroups,
        GetTransferServers { group: String },
        GetRateStatistics { destination: String },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FaultKind {
        NoSuchObject,
        NotBound,
        Protocol,
        Fault,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct WireFault {
        pub kind: FaultKind,
        pub message: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "status", content = "body", rename_all = "snake_case")]
    pub enum Reply {
        Ok(Value),
        Fault(WireFault),
    }

    impl From<&RemoteError> for WireFault {
        fn from(e: &RemoteError) -> WireFault {
            let (kind, message) = match e {
                RemoteError::NoSuchObject(m) => (FaultKind::NoSuchObject, m.clone()),
                RemoteError::NotBound(m) => (FaultKind::NotBound, m.clone()),
                RemoteError::Protocol(m) => (FaultKind::Protocol, m.clone()),
                RemoteError::Fault(m) => (FaultKind::Fault, m.clone()),
                other => (FaultKind::Fault, other.to_string()),
            };
            WireFault { kind, message }
        }
    }

    impl From<WireFault> for RemoteError {
        fn from(fault: WireFault) -> RemoteError {
            match fault.kind {
                FaultKind::NoSuchObject => RemoteError::NoSuchObject(fault.message),
                FaultKind::NotBound => RemoteError::NotBound(fault.message),
                FaultKind::Protocol => RemoteError::Protocol(fault.message),
                FaultKind::Fault => RemoteError::Fault(fault.message),
            }
        }
    }

    impl Reply {
        /// Serialise a service result into a reply.
        pub fn from_result<T: Serialize>(result: Result<T, RemoteError>) -> Reply {
            match result {
                Ok(value) => match serde_json::to_value(value) {
                    Ok(value) => Reply::Ok(value),
                    Err(e) => Reply::Fault(WireFault {
                        kind: FaultKind::Protocol,
                        message: e.to_string(),
                    }),
                },
                Err(e) => Reply::Fault(WireFault::from(&e)),
            }
        }
        /// Unpack a reply into the type the caller expects.
        pub fn into_result<T: DeserializeOwned>(self) -> Result<T, RemoteError> {
            match self {
                Reply::Ok(value) => serde_json::from_value(value)
                    .map_err(|e| RemoteError::Protocol(format!("unexpected reply body: {}", e))),
                Reply::Fault(fault) => Err(RemoteError::from(fault)),
            }
        }
    }
    ///
    /// Write one message as a single line and flush it.
    ///
    pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), RemoteError> {
        let mut line = serde_json::to_vec(message).map_err(|e| RemoteError::Protocol(e.to_string()))?;
        line.push(b'\n');
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
    ///
    /// Read one message.  Ok(None) means the peer closed the stream
    /// cleanly between messages.
    ///
    pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>, RemoteError> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        serde_json::from_str(line.trim_end())
            .map(Some)
            .map_err(|e| RemoteError::Protocol(format!("malformed message: {}", e)))
    }

}
