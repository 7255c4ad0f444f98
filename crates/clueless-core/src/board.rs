//! Board topology, suspects and character placement.
//!
//! This module contains:
//! - The closed card/location enumerations (suspects, weapons, rooms, hallways)
//! - `LocationName`, the wire-level name of every square on the board
//! - `Location`, a square with its occupancy flag and adjacency list
//! - `Board`, the location graph plus the character -> location map
//!
//! The layout is the Clue-Less 3x3 mansion: nine rooms joined by twelve
//! single-occupancy hallways, two secret passages across the corners, and a
//! home square for each suspect that opens onto one hallway.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The six suspects. Each player controls exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suspect {
    ColonelMustard,
    MissScarlet,
    MrGreen,
    MrsPeacock,
    MrsWhite,
    ProfessorPlum,
}

impl Suspect {
    /// All suspects, in seating-assignment order
    pub const ALL: [Suspect; 6] = [
        Suspect::ColonelMustard,
        Suspect::MissScarlet,
        Suspect::MrGreen,
        Suspect::MrsPeacock,
        Suspect::MrsWhite,
        Suspect::ProfessorPlum,
    ];

    /// Wire name, e.g. `MISS_SCARLET`
    pub fn as_str(&self) -> &'static str {
        match self {
            Suspect::ColonelMustard => "COLONEL_MUSTARD",
            Suspect::MissScarlet => "MISS_SCARLET",
            Suspect::MrGreen => "MR_GREEN",
            Suspect::MrsPeacock => "MRS_PEACOCK",
            Suspect::MrsWhite => "MRS_WHITE",
            Suspect::ProfessorPlum => "PROFESSOR_PLUM",
        }
    }

    /// Name used in announcements
    pub fn display_name(&self) -> &'static str {
        match self {
            Suspect::ColonelMustard => "Colonel Mustard",
            Suspect::MissScarlet => "Miss Scarlet",
            Suspect::MrGreen => "Mr. Green",
            Suspect::MrsPeacock => "Mrs. Peacock",
            Suspect::MrsWhite => "Mrs. White",
            Suspect::ProfessorPlum => "Professor Plum",
        }
    }

    /// The hallway this suspect's home square opens onto
    pub fn home_hallway(&self) -> Hallway {
        match self {
            Suspect::MissScarlet => Hallway::H2,
            Suspect::ColonelMustard => Hallway::H5,
            Suspect::MrsWhite => Hallway::H12,
            Suspect::MrGreen => Hallway::H11,
            Suspect::MrsPeacock => Hallway::H8,
            Suspect::ProfessorPlum => Hallway::H3,
        }
    }

    /// Starting room on the standard board
    pub fn starting_room(&self) -> Room {
        match self {
            Suspect::ColonelMustard => Room::Study,
            Suspect::MissScarlet => Room::Hall,
            Suspect::MrGreen => Room::Lounge,
            Suspect::MrsPeacock => Room::Library,
            Suspect::MrsWhite => Room::BilliardRoom,
            Suspect::ProfessorPlum => Room::DiningRoom,
        }
    }
}

impl fmt::Display for Suspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The six weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weapon {
    Candlestick,
    Dagger,
    LeadPipe,
    Revolver,
    Rope,
    Wrench,
}

impl Weapon {
    pub const ALL: [Weapon; 6] = [
        Weapon::Candlestick,
        Weapon::Dagger,
        Weapon::LeadPipe,
        Weapon::Revolver,
        Weapon::Rope,
        Weapon::Wrench,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Weapon::Candlestick => "Candlestick",
            Weapon::Dagger => "Dagger",
            Weapon::LeadPipe => "Lead Pipe",
            Weapon::Revolver => "Revolver",
            Weapon::Rope => "Rope",
            Weapon::Wrench => "Wrench",
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The nine rooms, listed row by row across the mansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Room {
    Study,
    Hall,
    Lounge,
    Library,
    BilliardRoom,
    DiningRoom,
    Conservatory,
    Ballroom,
    Kitchen,
}

impl Room {
    pub const ALL: [Room; 9] = [
        Room::Study,
        Room::Hall,
        Room::Lounge,
        Room::Library,
        Room::BilliardRoom,
        Room::DiningRoom,
        Room::Conservatory,
        Room::Ballroom,
        Room::Kitchen,
    ];

    /// Wire name, e.g. `BILLIARD_ROOM`
    pub fn as_str(&self) -> &'static str {
        match self {
            Room::Study => "STUDY",
            Room::Hall => "HALL",
            Room::Lounge => "LOUNGE",
            Room::Library => "LIBRARY",
            Room::BilliardRoom => "BILLIARD_ROOM",
            Room::DiningRoom => "DINING_ROOM",
            Room::Conservatory => "CONSERVATORY",
            Room::Ballroom => "BALLROOM",
            Room::Kitchen => "KITCHEN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Room::Study => "Study",
            Room::Hall => "Hall",
            Room::Lounge => "Lounge",
            Room::Library => "Library",
            Room::BilliardRoom => "Billiard Room",
            Room::DiningRoom => "Dining Room",
            Room::Conservatory => "Conservatory",
            Room::Ballroom => "Ballroom",
            Room::Kitchen => "Kitchen",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The twelve single-occupancy hallways, H1..H12
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Hallway {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    H7,
    H8,
    H9,
    H10,
    H11,
    H12,
}

impl Hallway {
    pub const ALL: [Hallway; 12] = [
        Hallway::H1,
        Hallway::H2,
        Hallway::H3,
        Hallway::H4,
        Hallway::H5,
        Hallway::H6,
        Hallway::H7,
        Hallway::H8,
        Hallway::H9,
        Hallway::H10,
        Hallway::H11,
        Hallway::H12,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hallway::H1 => "H1",
            Hallway::H2 => "H2",
            Hallway::H3 => "H3",
            Hallway::H4 => "H4",
            Hallway::H5 => "H5",
            Hallway::H6 => "H6",
            Hallway::H7 => "H7",
            Hallway::H8 => "H8",
            Hallway::H9 => "H9",
            Hallway::H10 => "H10",
            Hallway::H11 => "H11",
            Hallway::H12 => "H12",
        }
    }

    /// The two rooms this hallway connects
    pub fn ends(&self) -> (Room, Room) {
        match self {
            Hallway::H1 => (Room::Study, Room::Hall),
            Hallway::H2 => (Room::Hall, Room::Lounge),
            Hallway::H3 => (Room::Study, Room::Library),
            Hallway::H4 => (Room::Hall, Room::BilliardRoom),
            Hallway::H5 => (Room::Lounge, Room::DiningRoom),
            Hallway::H6 => (Room::Library, Room::BilliardRoom),
            Hallway::H7 => (Room::BilliardRoom, Room::DiningRoom),
            Hallway::H8 => (Room::Library, Room::Conservatory),
            Hallway::H9 => (Room::BilliardRoom, Room::Ballroom),
            Hallway::H10 => (Room::DiningRoom, Room::Kitchen),
            Hallway::H11 => (Room::Conservatory, Room::Ballroom),
            Hallway::H12 => (Room::Ballroom, Room::Kitchen),
        }
    }
}

/// Kind of square, which decides occupancy rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationKind {
    /// Unbounded occupancy, suggestions allowed
    Room,
    /// At most one character
    Corridor,
    /// A suspect's starting square, unbounded occupancy
    HomeSquare,
}

/// Wire name of a square on the board.
///
/// Serializes as a flat string: `STUDY`, `H7`, `MISS_SCARLET_HOME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum LocationName {
    Room(Room),
    Hallway(Hallway),
    Home(Suspect),
}

impl LocationName {
    /// Every square on the board, rooms first, then hallways, then home squares
    pub fn all() -> impl Iterator<Item = LocationName> {
        Room::ALL
            .into_iter()
            .map(LocationName::Room)
            .chain(Hallway::ALL.into_iter().map(LocationName::Hallway))
            .chain(Suspect::ALL.into_iter().map(LocationName::Home))
    }

    pub fn kind(&self) -> LocationKind {
        match self {
            LocationName::Room(_) => LocationKind::Room,
            LocationName::Hallway(_) => LocationKind::Corridor,
            LocationName::Home(_) => LocationKind::HomeSquare,
        }
    }

    /// The room, if this square is one
    pub fn room(&self) -> Option<Room> {
        match self {
            LocationName::Room(room) => Some(*room),
            _ => None,
        }
    }

    /// Neighbours in declared order.
    ///
    /// The order here is part of the board definition: legal moves are
    /// reported in this order.
    pub fn adjacency(&self) -> Vec<LocationName> {
        use Hallway::*;
        use LocationName::{Hallway as H, Room as R};

        match self {
            R(room) => match room {
                Room::Study => vec![H(H1), H(H3), R(Room::Kitchen)],
                Room::Hall => vec![H(H1), H(H2), H(H4)],
                Room::Lounge => vec![H(H2), H(H5), R(Room::Conservatory)],
                Room::Library => vec![H(H3), H(H6), H(H8)],
                Room::BilliardRoom => vec![H(H4), H(H6), H(H7), H(H9)],
                Room::DiningRoom => vec![H(H5), H(H7), H(H10)],
                Room::Conservatory => vec![H(H8), H(H11), R(Room::Lounge)],
                Room::Ballroom => vec![H(H9), H(H11), H(H12)],
                Room::Kitchen => vec![H(H10), H(H12), R(Room::Study)],
            },
            H(hallway) => {
                let (a, b) = hallway.ends();
                vec![R(a), R(b)]
            }
            LocationName::Home(suspect) => vec![H(suspect.home_hallway())],
        }
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationName::Room(room) => f.write_str(room.as_str()),
            LocationName::Hallway(hallway) => f.write_str(hallway.as_str()),
            LocationName::Home(suspect) => write!(f, "{}_HOME", suspect.as_str()),
        }
    }
}

/// Error for a string that names no square on the board
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown location name: {0}")]
pub struct UnknownLocation(pub String);

impl FromStr for LocationName {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationName::all()
            .find(|name| name.to_string() == s)
            .ok_or_else(|| UnknownLocation(s.to_string()))
    }
}

impl From<LocationName> for String {
    fn from(name: LocationName) -> Self {
        name.to_string()
    }
}

impl TryFrom<String> for LocationName {
    type Error = UnknownLocation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A square on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: LocationName,
    /// Only ever set on corridors
    occupied: bool,
    pub adjacent: Vec<LocationName>,
}

impl Location {
    fn new(name: LocationName) -> Self {
        Self {
            name,
            occupied: false,
            adjacent: name.adjacency(),
        }
    }

    pub fn kind(&self) -> LocationKind {
        self.name.kind()
    }

    /// Whether another character may enter this square
    pub fn is_full(&self) -> bool {
        self.occupied
    }

    /// Rooms and home squares have unbounded capacity, so this only
    /// changes corridors.
    fn set_full(&mut self, full: bool) {
        if self.kind() == LocationKind::Corridor {
            self.occupied = full;
        }
    }
}

/// The mansion: every location plus where each suspect stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    locations: BTreeMap<LocationName, Location>,
    /// Total and exclusive: one entry per suspect at all times
    positions: BTreeMap<Suspect, LocationName>,
}

impl Board {
    /// Board with every suspect on their home square
    pub fn with_home_starts() -> Self {
        let locations = LocationName::all()
            .map(|name| (name, Location::new(name)))
            .collect();
        let positions = Suspect::ALL
            .into_iter()
            .map(|suspect| (suspect, LocationName::Home(suspect)))
            .collect();

        Self {
            locations,
            positions,
        }
    }

    /// Standard start: each suspect in a distinct room
    pub fn standard() -> Self {
        let mut board = Self::with_home_starts();
        for suspect in Suspect::ALL {
            board.move_character(suspect, LocationName::Room(suspect.starting_room()));
        }
        board
    }

    /// Look up a square. Every name in the closed enumeration is present.
    pub fn location(&self, name: LocationName) -> &Location {
        &self.locations[&name]
    }

    /// Name of the square a suspect stands on
    pub fn position(&self, suspect: Suspect) -> LocationName {
        self.positions[&suspect]
    }

    /// The square a suspect stands on
    pub fn location_of(&self, suspect: Suspect) -> &Location {
        self.location(self.position(suspect))
    }

    /// Room the suspect is in, if any
    pub fn room_of(&self, suspect: Suspect) -> Option<Room> {
        self.position(suspect).room()
    }

    /// Relocate a suspect, keeping corridor occupancy in step.
    ///
    /// No legality check: callers decide whether the move is allowed.
    pub fn move_character(&mut self, suspect: Suspect, destination: LocationName) {
        let previous = self.position(suspect);
        if let Some(location) = self.locations.get_mut(&previous) {
            location.set_full(false);
        }
        if let Some(location) = self.locations.get_mut(&destination) {
            location.set_full(true);
        }
        self.positions.insert(suspect, destination);
    }

    /// Adjacent squares of `from` that can be entered right now.
    ///
    /// Occupied corridors are dropped; rooms and home squares never are.
    /// Order follows the declared adjacency.
    pub fn open_neighbours(&self, from: LocationName) -> Vec<LocationName> {
        self.location(from)
            .adjacent
            .iter()
            .copied()
            .filter(|name| !self.location(*name).is_full())
            .collect()
    }

    /// Where a suspect may legally move from their current square
    pub fn legal_destinations(&self, suspect: Suspect) -> Vec<LocationName> {
        self.open_neighbours(self.position(suspect))
    }

    /// Suspects standing on a square, in suspect order
    pub fn occupants(&self, name: LocationName) -> Vec<Suspect> {
        self.positions
            .iter()
            .filter(|(_, at)| **at == name)
            .map(|(suspect, _)| *suspect)
            .collect()
    }

    /// Value copy of the character -> location map for notifications
    pub fn snapshot(&self) -> BTreeMap<Suspect, LocationName> {
        self.positions.clone()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hall(h: Hallway) -> LocationName {
        LocationName::Hallway(h)
    }

    fn room(r: Room) -> LocationName {
        LocationName::Room(r)
    }

    #[test]
    fn test_standard_board_places_everyone_in_distinct_rooms() {
        let board = Board::standard();
        let snapshot = board.snapshot();

        assert_eq!(snapshot.len(), 6);
        assert_eq!(board.position(Suspect::ColonelMustard), room(Room::Study));
        assert_eq!(board.position(Suspect::MissScarlet), room(Room::Hall));

        let rooms: std::collections::BTreeSet<_> = snapshot.values().collect();
        assert_eq!(rooms.len(), 6);
        assert!(rooms.iter().all(|name| name.kind() == LocationKind::Room));
    }

    #[test]
    fn test_mustard_destinations_from_study() {
        let board = Board::standard();
        assert_eq!(
            board.legal_destinations(Suspect::ColonelMustard),
            vec![hall(Hallway::H1), hall(Hallway::H3), room(Room::Kitchen)]
        );
    }

    #[test]
    fn test_occupied_corridor_is_filtered() {
        let mut board = Board::standard();
        board.move_character(Suspect::MissScarlet, hall(Hallway::H1));

        assert_eq!(
            board.legal_destinations(Suspect::ColonelMustard),
            vec![hall(Hallway::H3), room(Room::Kitchen)]
        );
    }

    #[test]
    fn test_rooms_are_never_filtered() {
        let mut board = Board::standard();
        board.move_character(Suspect::MrGreen, room(Room::Kitchen));
        board.move_character(Suspect::MrsWhite, room(Room::Kitchen));

        assert!(board
            .legal_destinations(Suspect::ColonelMustard)
            .contains(&room(Room::Kitchen)));
    }

    #[test]
    fn test_move_clears_previous_corridor() {
        let mut board = Board::standard();
        board.move_character(Suspect::ColonelMustard, hall(Hallway::H1));
        assert!(board.location(hall(Hallway::H1)).is_full());

        board.move_character(Suspect::ColonelMustard, room(Room::Hall));
        assert!(!board.location(hall(Hallway::H1)).is_full());
        assert!(!board.location(room(Room::Hall)).is_full());
    }

    #[test]
    fn test_repeated_move_is_idempotent_on_occupancy() {
        let mut board = Board::standard();
        board.move_character(Suspect::ColonelMustard, hall(Hallway::H3));
        board.move_character(Suspect::ColonelMustard, hall(Hallway::H3));

        assert!(board.location(hall(Hallway::H3)).is_full());
        assert_eq!(board.occupants(hall(Hallway::H3)), vec![Suspect::ColonelMustard]);
    }

    #[test]
    fn test_each_suspect_has_exactly_one_location() {
        let mut board = Board::standard();
        board.move_character(Suspect::MrsPeacock, hall(Hallway::H8));
        board.move_character(Suspect::MrsPeacock, room(Room::Conservatory));

        for suspect in Suspect::ALL {
            let count = LocationName::all()
                .filter(|name| board.occupants(*name).contains(&suspect))
                .count();
            assert_eq!(count, 1, "{suspect} should stand on exactly one square");
        }
    }

    #[test]
    fn test_home_square_opens_onto_one_hallway() {
        let board = Board::with_home_starts();
        assert_eq!(
            board.legal_destinations(Suspect::MissScarlet),
            vec![hall(Hallway::H2)]
        );
        assert_eq!(board.location_of(Suspect::MissScarlet).kind(), LocationKind::HomeSquare);
    }

    #[test]
    fn test_hallway_adjacency_is_symmetric() {
        for hallway in Hallway::ALL {
            let (a, b) = hallway.ends();
            assert!(room(a).adjacency().contains(&hall(hallway)));
            assert!(room(b).adjacency().contains(&hall(hallway)));
        }
    }

    #[test]
    fn test_location_names_round_trip_through_strings() {
        assert_eq!(hall(Hallway::H12).to_string(), "H12");
        assert_eq!(room(Room::BilliardRoom).to_string(), "BILLIARD_ROOM");
        assert_eq!(
            LocationName::Home(Suspect::MissScarlet).to_string(),
            "MISS_SCARLET_HOME"
        );
        assert_eq!("H1".parse::<LocationName>(), Ok(hall(Hallway::H1)));
        assert!("H13".parse::<LocationName>().is_err());
    }

    #[test]
    fn test_location_name_serializes_as_flat_string() {
        let json = serde_json::to_string(&room(Room::Lounge)).unwrap();
        assert_eq!(json, "\"LOUNGE\"");

        let snapshot = Board::standard().snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["MISS_SCARLET"], "HALL");
    }
}
