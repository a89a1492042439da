use std::fmt;

/// The result code of an OPC UA operation.
///
/// The two most significant bits carry the severity (`Good`, `Uncertain`, `Bad`), the rest of the
/// upper word identifies the code and the lower word holds informational flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatusCode(u32);

const SEVERITY_MASK: u32 = 0xC000_0000;
const UNCERTAIN: u32 = 0x4000_0000;
const BAD: u32 = 0x8000_0000;
const CODE_MASK: u32 = 0xFFFF_0000;

/// `(code, name, description)` for the codes this crate and its users run into.
const KNOWN_CODES: &[(u32, &str, &str)] = &[
    (0x0000_0000, "Good", "No Error"),
    (0x4000_0000, "Uncertain", "The value is uncertain but no specific reason is known."),
    (0x8000_0000, "Bad", "The value is bad but no specific reason is known."),
    (0x8001_0000, "BadUnexpectedError", "An unexpected error occurred."),
    (
        0x8002_0000,
        "BadInternalError",
        "An internal error occurred as a result of a programming or configuration error.",
    ),
    (0x8003_0000, "BadOutOfMemory", "Not enough memory to complete the operation."),
    (0x8004_0000, "BadResourceUnavailable", "An operating system resource is not available."),
    (0x8005_0000, "BadCommunicationError", "A low level communication error occurred."),
    (
        0x8006_0000,
        "BadEncodingError",
        "Encoding halted because of invalid data in the objects being serialized.",
    ),
    (0x8007_0000, "BadDecodingError", "Decoding halted because of invalid data in the stream."),
    (0x800A_0000, "BadTimeout", "The operation timed out."),
    (0x800B_0000, "BadServiceUnsupported", "The server does not support the requested service."),
    (
        0x800C_0000,
        "BadShutdown",
        "The operation was cancelled because the application is shutting down.",
    ),
    (
        0x800D_0000,
        "BadServerNotConnected",
        "The operation could not complete because the client is not connected to the server.",
    ),
    (
        0x800F_0000,
        "BadNothingToDo",
        "There was nothing to do because the client passed a list of operations with no elements.",
    ),
    (
        0x8010_0000,
        "BadTooManyOperations",
        "The request could not be processed because it specified too many operations.",
    ),
    (
        0x801F_0000,
        "BadUserAccessDenied",
        "User does not have permission to perform the requested operation.",
    ),
    (0x8033_0000, "BadNodeIdInvalid", "The syntax of the node id is not valid."),
    (
        0x8034_0000,
        "BadNodeIdUnknown",
        "The node id refers to a node that does not exist in the server address space.",
    ),
    (
        0x8035_0000,
        "BadAttributeIdInvalid",
        "The attribute is not supported for the specified Node.",
    ),
    (
        0x803A_0000,
        "BadNotReadable",
        "The access level does not allow reading or subscribing to the Node.",
    ),
    (0x803C_0000, "BadOutOfRange", "The value was out of range."),
    (0x8040_0000, "BadNotImplemented", "Requested operation is not implemented."),
    (
        0x804C_0000,
        "BadReferenceTypeIdInvalid",
        "The reference type id does not refer to a valid reference type node.",
    ),
    (0x804D_0000, "BadBrowseDirectionInvalid", "The browse direction is not valid."),
    (
        0x8074_0000,
        "BadTypeMismatch",
        "The value supplied for the attribute is not of the same type as the attribute's value.",
    ),
    (
        0x8075_0000,
        "BadMethodInvalid",
        "The method id does not refer to a method for the specified object.",
    ),
    (
        0x8076_0000,
        "BadArgumentsMissing",
        "The client did not specify all of the input arguments for the method.",
    ),
    (0x80AB_0000, "BadInvalidArgument", "One or more arguments are invalid."),
    (0x80E5_0000, "BadTooManyArguments", "Too many arguments were provided."),
];

impl StatusCode {
    pub const GOOD: Self = Self(0x0000_0000);
    pub const UNCERTAIN: Self = Self(UNCERTAIN);
    pub const BAD: Self = Self(BAD);
    pub const BAD_UNEXPECTED_ERROR: Self = Self(0x8001_0000);
    pub const BAD_INTERNAL_ERROR: Self = Self(0x8002_0000);
    pub const BAD_TIMEOUT: Self = Self(0x800A_0000);
    pub const BAD_NOTHING_TO_DO: Self = Self(0x800F_0000);
    pub const BAD_USER_ACCESS_DENIED: Self = Self(0x801F_0000);
    pub const BAD_NODE_ID_INVALID: Self = Self(0x8033_0000);
    pub const BAD_NODE_ID_UNKNOWN: Self = Self(0x8034_0000);
    pub const BAD_ATTRIBUTE_ID_INVALID: Self = Self(0x8035_0000);
    pub const BAD_NOT_READABLE: Self = Self(0x803A_0000);
    pub const BAD_OUT_OF_RANGE: Self = Self(0x803C_0000);
    pub const BAD_NOT_IMPLEMENTED: Self = Self(0x8040_0000);
    pub const BAD_TYPE_MISMATCH: Self = Self(0x8074_0000);
    pub const BAD_METHOD_INVALID: Self = Self(0x8075_0000);
    pub const BAD_ARGUMENTS_MISSING: Self = Self(0x8076_0000);
    pub const BAD_INVALID_ARGUMENT: Self = Self(0x80AB_0000);
    pub const BAD_TOO_MANY_ARGUMENTS: Self = Self(0x80E5_0000);

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_good(self) -> bool {
        self.0 & SEVERITY_MASK == 0
    }

    pub const fn is_uncertain(self) -> bool {
        self.0 & SEVERITY_MASK == UNCERTAIN
    }

    pub const fn is_bad(self) -> bool {
        self.0 & BAD == BAD
    }

    fn lookup(self) -> Option<&'static (u32, &'static str, &'static str)> {
        KNOWN_CODES
            .iter()
            .find(|(code, _, _)| *code == self.0 & CODE_MASK)
    }

    /// The symbolic name of the code, or its bare severity when the code is not a known one.
    pub fn name(self) -> &'static str {
        match self.lookup() {
            Some((_, name, _)) => *name,
            None if self.is_good() => "Good",
            None if self.is_uncertain() => "Uncertain",
            None => "Bad",
        }
    }

    pub fn description(self) -> &'static str {
        self.lookup()
            .map(|(_, _, description)| *description)
            .unwrap_or("Unknown status code")
    }
}

impl From<u32> for StatusCode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self.name(), self.0)
    }
}
