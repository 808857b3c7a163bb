//! Concrete host bridges.
//!
//! [`ChannelBridge`] hands events to an in-process host over a crossbeam
//! channel. [`OscBridge`] sends them to an out-of-process host as OSC over
//! UDP. [`WriterBridge`] writes one JSON object per line, for hosts that
//! read a pipe.

use std::io::Write;
use std::net::UdpSocket;

use crossbeam_channel::{Receiver, Sender};
use rosc::{OscMessage, OscPacket, OscType};

use kitpanel_types::{ControlValue, HostEvent};

use crate::router::HostBridge;

pub struct ChannelBridge {
    tx: Sender<HostEvent>,
}

impl ChannelBridge {
    pub fn new(tx: Sender<HostEvent>) -> Self {
        Self { tx }
    }

    pub fn unbounded() -> (Self, Receiver<HostEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }
}

impl HostBridge for ChannelBridge {
    fn emit(&mut self, event: &HostEvent) {
        if let Err(e) = self.tx.send(event.clone()) {
            log::warn!(target: "bridge", "host channel closed, dropping {}: {}", event.name(), e);
        }
    }
}

/// OSC address for a host event: `/controlChange` or `/genericEvent`.
pub fn osc_address(event: &HostEvent) -> String {
    format!("/{}", event.name())
}

fn osc_value(value: &ControlValue) -> OscType {
    match value {
        ControlValue::Number(v) => OscType::Double(*v),
        ControlValue::Toggle(b) => OscType::Bool(*b),
        ControlValue::Text(s) => OscType::String(s.clone()),
    }
}

/// `/controlChange drum control value` or `/genericEvent id value`.
pub fn osc_message(event: &HostEvent) -> OscMessage {
    let args = match event {
        HostEvent::ControlChange {
            drum,
            control,
            value,
        } => vec![
            OscType::String(drum.to_string()),
            OscType::String(control.clone()),
            osc_value(value),
        ],
        HostEvent::GenericEvent { id, value } => {
            vec![OscType::String(id.clone()), osc_value(value)]
        }
    };
    OscMessage {
        addr: osc_address(event),
        args,
    }
}

pub struct OscBridge {
    socket: UdpSocket,
    target: String,
}

impl OscBridge {
    pub fn new(target: &str) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            target: target.to_string(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn send(&self, event: &HostEvent) -> std::io::Result<()> {
        let packet = OscPacket::Message(osc_message(event));
        let buf = rosc::encoder::encode(&packet)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        self.socket.send_to(&buf, &self.target)?;
        Ok(())
    }
}

impl HostBridge for OscBridge {
    fn emit(&mut self, event: &HostEvent) {
        if let Err(e) = self.send(event) {
            log::warn!(target: "bridge", "OSC send to {} failed: {}", self.target, e);
        }
    }
}

pub struct WriterBridge<W: Write> {
    out: W,
}

impl<W: Write> WriterBridge<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_event(&mut self, event: &HostEvent) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> HostBridge for WriterBridge<W> {
    fn emit(&mut self, event: &HostEvent) {
        if let Err(e) = self.write_event(event) {
            log::warn!(target: "bridge", "failed to write {}: {}", event.name(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitpanel_types::InstrumentId;

    fn pitch_change() -> HostEvent {
        HostEvent::ControlChange {
            drum: InstrumentId::Drum1,
            control: "pitch-knob".into(),
            value: ControlValue::Number(7.0),
        }
    }

    #[test]
    fn channel_bridge_forwards() {
        let (mut bridge, rx) = ChannelBridge::unbounded();
        bridge.emit(&pitch_change());
        assert_eq!(rx.try_recv().ok(), Some(pitch_change()));
    }

    #[test]
    fn channel_bridge_survives_closed_receiver() {
        let (mut bridge, rx) = ChannelBridge::unbounded();
        drop(rx);
        bridge.emit(&pitch_change());
    }

    #[test]
    fn osc_message_layout() {
        let msg = osc_message(&pitch_change());
        assert_eq!(msg.addr, "/controlChange");
        assert_eq!(
            msg.args,
            vec![
                OscType::String("drum1".into()),
                OscType::String("pitch-knob".into()),
                OscType::Double(7.0),
            ]
        );

        let generic = HostEvent::GenericEvent {
            id: "solo-all".into(),
            value: ControlValue::Toggle(true),
        };
        let msg = osc_message(&generic);
        assert_eq!(msg.addr, "/genericEvent");
        assert_eq!(
            msg.args,
            vec![OscType::String("solo-all".into()), OscType::Bool(true)]
        );
    }

    #[test]
    fn osc_bridge_reaches_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let bridge = OscBridge::new(&addr).unwrap();
        bridge.send(&pitch_change()).unwrap();

        let mut buf = [0u8; 1024];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        let (_, packet) = rosc::decoder::decode_udp(&buf[..len]).unwrap();
        match packet {
            OscPacket::Message(msg) => assert_eq!(msg, osc_message(&pitch_change())),
            other => panic!("unexpected packet {:?}", other),
        }
    }

    #[test]
    fn writer_bridge_writes_json_lines() {
        let mut bridge = WriterBridge::new(Vec::new());
        bridge.emit(&pitch_change());
        bridge.emit(&HostEvent::GenericEvent {
            id: "tempo".into(),
            value: ControlValue::Number(120.0),
        });
        let out = String::from_utf8(bridge.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "controlChange");
        assert_eq!(first["value"], 7.0);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "genericEvent");
        assert_eq!(second["id"], "tempo");
    }
}
