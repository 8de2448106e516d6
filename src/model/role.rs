#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Owner = 1,
    Employee = 2,
    Client = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Owner),
            2 => Some(Role::Employee),
            3 => Some(Role::Client),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}
