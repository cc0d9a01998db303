use std::fmt;

/// How deeply foreign-key references are expanded when reading a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadFollow {
    /// Read only the key value.
    NoFollow,

    /// Join the referenced tables and read them with `NoFollow`.
    FollowOneLevel,

    /// Join recursively down to the leaves.
    FollowAll,
}

impl ReadFollow {
    pub const ALL: [ReadFollow; 3] = [
        ReadFollow::NoFollow,
        ReadFollow::FollowOneLevel,
        ReadFollow::FollowAll,
    ];

    /// The policy applied to a table reached through one join.
    pub fn next(self) -> ReadFollow {
        match self {
            ReadFollow::NoFollow | ReadFollow::FollowOneLevel => ReadFollow::NoFollow,
            ReadFollow::FollowAll => ReadFollow::FollowAll,
        }
    }

    pub fn is_follow(self) -> bool {
        self != ReadFollow::NoFollow
    }

    pub fn variant_name(self) -> &'static str {
        match self {
            ReadFollow::NoFollow => "NoFollow",
            ReadFollow::FollowOneLevel => "FollowOneLevel",
            ReadFollow::FollowAll => "FollowAll",
        }
    }
}

impl fmt::Display for ReadFollow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variant_name())
    }
}
