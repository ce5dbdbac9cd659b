//! Event code layout used by the bridge library.
//!
//! A 64-bit event code carries the event type in its upper 32 bits and a
//! sub type (usually a key or command id) in the lower 32 bits. Nothing in
//! the call path interprets codes; this is for logging and for host code
//! that wants to build or inspect them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnityEventType {
    SetValue,
    GetValue,
    GetAvailableValue,
    PerformAction,
    StartListening,
    StopListening,
    Activation,
    LocalAlbum,
    FirmwareUpgrade,
    Connection,
    Security,
    PrintLog,
    StartVideo,
    StopVideo,
    Render,
    GetNativeTexture,
    VideoTransferSpeed,
    AudioDataRecv,
    VideoDataRecv,
    NativeFunctions,
    /// A type number this crate has no name for. Kept as is.
    Other(u32),
}

impl UnityEventType {
    pub const KNOWN: [UnityEventType; 20] = [
        UnityEventType::SetValue,
        UnityEventType::GetValue,
        UnityEventType::GetAvailableValue,
        UnityEventType::PerformAction,
        UnityEventType::StartListening,
        UnityEventType::StopListening,
        UnityEventType::Activation,
        UnityEventType::LocalAlbum,
        UnityEventType::FirmwareUpgrade,
        UnityEventType::Connection,
        UnityEventType::Security,
        UnityEventType::PrintLog,
        UnityEventType::StartVideo,
        UnityEventType::StopVideo,
        UnityEventType::Render,
        UnityEventType::GetNativeTexture,
        UnityEventType::VideoTransferSpeed,
        UnityEventType::AudioDataRecv,
        UnityEventType::VideoDataRecv,
        UnityEventType::NativeFunctions,
    ];

    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => UnityEventType::SetValue,
            1 => UnityEventType::GetValue,
            2 => UnityEventType::GetAvailableValue,
            3 => UnityEventType::PerformAction,
            4 => UnityEventType::StartListening,
            5 => UnityEventType::StopListening,
            6 => UnityEventType::Activation,
            7 => UnityEventType::LocalAlbum,
            8 => UnityEventType::FirmwareUpgrade,
            100 => UnityEventType::Connection,
            101 => UnityEventType::Security,
            200 => UnityEventType::PrintLog,
            300 => UnityEventType::StartVideo,
            301 => UnityEventType::StopVideo,
            302 => UnityEventType::Render,
            303 => UnityEventType::GetNativeTexture,
            304 => UnityEventType::VideoTransferSpeed,
            305 => UnityEventType::AudioDataRecv,
            306 => UnityEventType::VideoDataRecv,
            500 => UnityEventType::NativeFunctions,
            other => UnityEventType::Other(other),
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            UnityEventType::SetValue => 0,
            UnityEventType::GetValue => 1,
            UnityEventType::GetAvailableValue => 2,
            UnityEventType::PerformAction => 3,
            UnityEventType::StartListening => 4,
            UnityEventType::StopListening => 5,
            UnityEventType::Activation => 6,
            UnityEventType::LocalAlbum => 7,
            UnityEventType::FirmwareUpgrade => 8,
            UnityEventType::Connection => 100,
            UnityEventType::Security => 101,
            UnityEventType::PrintLog => 200,
            UnityEventType::StartVideo => 300,
            UnityEventType::StopVideo => 301,
            UnityEventType::Render => 302,
            UnityEventType::GetNativeTexture => 303,
            UnityEventType::VideoTransferSpeed => 304,
            UnityEventType::AudioDataRecv => 305,
            UnityEventType::VideoDataRecv => 306,
            UnityEventType::NativeFunctions => 500,
            UnityEventType::Other(value) => value,
        }
    }

    /// Look up a known type by its name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::KNOWN
            .iter()
            .copied()
            .find(|t| format!("{t:?}").eq_ignore_ascii_case(name))
    }
}

/// An event code split into type and sub type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnityEvent {
    event_type: UnityEventType,
    sub_type: u32,
}

impl UnityEvent {
    pub fn new(event_type: UnityEventType, sub_type: u32) -> Self {
        UnityEvent {
            event_type,
            sub_type,
        }
    }

    pub fn from_code(code: u64) -> Self {
        UnityEvent {
            event_type: UnityEventType::from_u32((code >> 32) as u32),
            sub_type: (code & 0xFFFF_FFFF) as u32,
        }
    }

    pub fn code(&self) -> u64 {
        (u64::from(self.event_type.as_u32()) << 32) | u64::from(self.sub_type)
    }

    pub fn event_type(&self) -> UnityEventType {
        self.event_type
    }

    pub fn sub_type(&self) -> u32 {
        self.sub_type
    }
}

impl From<UnityEventType> for UnityEvent {
    fn from(event_type: UnityEventType) -> Self {
        UnityEvent::new(event_type, 0)
    }
}

impl fmt::Display for UnityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.event_type {
            UnityEventType::Other(value) => write!(f, "type {}/{:#x}", value, self.sub_type),
            known => write!(f, "{:?}/{:#x}", known, self.sub_type),
        }
    }
}
