/// Id of a connected member inside a room
pub type MemberId = u16;

/// Application-defined tag naming an object's kind
pub type TemplateId = u16;

/// Bit mask of groups allowed to see an object
pub type AccessGroups = u64;
