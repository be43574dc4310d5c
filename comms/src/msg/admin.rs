use std::io;

use crate::{
    Deserialize, Serialize,
    specs::{ActionStatusUpdate, NodeInfo, RunnableActionInstance},
};

use super::{ADMIN_REQUEST, ADMIN_RESPONSE, invalid_kind, put_kind, split_kind};

/// A request sent by an agent to the admin service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRequest {
    RegisterAgent {
        node_info: NodeInfo,
        agent_name: String,
    },
    Heartbeat {
        node_id: String,
        at: u64,
    },
    GetRunnableActionInstances {
        worker_type: String,
        arch: String,
    },
    UpdateActionStatus {
        update: ActionStatusUpdate,
    },
}

/// The admin service's reply to an `AdminRequest`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminResponse {
    Registered { node_id: String },
    Ack,
    RunnableActions { instances: Vec<RunnableActionInstance> },
    Err { detail: String },
}

impl<'a> Serialize<'a> for AdminRequest {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        put_kind(buf, ADMIN_REQUEST);

        // SAFETY: Serialize impl for `AdminRequest` is derived and not
        //         implemented by hand. Nor has a non string-key map inside.
        serde_json::to_writer(buf, self).unwrap();
        None
    }
}

impl<'a> Deserialize<'a> for AdminRequest {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        let (kind, rest) = split_kind(buf)?;
        match kind {
            ADMIN_REQUEST => Ok(serde_json::from_slice(rest)?),
            other => invalid_kind(other),
        }
    }
}

impl<'a> Serialize<'a> for AdminResponse {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        put_kind(buf, ADMIN_RESPONSE);

        // SAFETY: see the `AdminRequest` impl.
        serde_json::to_writer(buf, self).unwrap();
        None
    }
}

impl<'a> Deserialize<'a> for AdminResponse {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        let (kind, rest) = split_kind(buf)?;
        match kind {
            ADMIN_RESPONSE => Ok(serde_json::from_slice(rest)?),
            other => invalid_kind(other),
        }
    }
}
