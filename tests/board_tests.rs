use broadside::{Board, BoardError, Cell, Coord, Orientation, Outcome, Part, Span};

fn c(x: usize, y: usize) -> Coord {
    Coord::new(x, y)
}

#[test]
fn vertical_placement_has_end_caps() {
    let mut board = Board::own();
    let span = board.place_ship(c(2, 3), c(2, 0)).unwrap();
    assert_eq!(span.orientation, Orientation::Vertical);
    assert_eq!((span.start, span.end), (c(2, 0), c(2, 3)));
    assert_eq!(board.get(c(2, 0)).unwrap(), Cell::ship(Part::Top));
    assert_eq!(board.get(c(2, 1)).unwrap(), Cell::ship(Part::Vertical));
    assert_eq!(board.get(c(2, 2)).unwrap(), Cell::ship(Part::Vertical));
    assert_eq!(board.get(c(2, 3)).unwrap(), Cell::ship(Part::Bottom));
    assert_eq!(board.live_ship_cells(), 4);
}

#[test]
fn horizontal_placement_has_end_caps() {
    let mut board = Board::own();
    board.place_ship(c(7, 5), c(5, 5)).unwrap();
    assert_eq!(board.get(c(5, 5)).unwrap(), Cell::ship(Part::Left));
    assert_eq!(board.get(c(6, 5)).unwrap(), Cell::ship(Part::Horizontal));
    assert_eq!(board.get(c(7, 5)).unwrap(), Cell::ship(Part::Right));
}

#[test]
fn two_cell_ship_is_caps_only() {
    let mut board = Board::own();
    board.place_ship(c(0, 0), c(0, 1)).unwrap();
    assert_eq!(board.get(c(0, 0)).unwrap(), Cell::ship(Part::Top));
    assert_eq!(board.get(c(0, 1)).unwrap(), Cell::ship(Part::Bottom));
}

#[test]
fn single_cell_ship() {
    let mut board = Board::own();
    let span = board.place_ship(c(4, 4), c(4, 4)).unwrap();
    assert_eq!(span.len(), 1);
    assert_eq!(board.get(c(4, 4)).unwrap(), Cell::ship(Part::Single));
    assert_eq!(board.resolve_shot(c(4, 4)).unwrap(), Outcome::Destroyed(span));
}

#[test]
fn overlapping_placement_leaves_board_unchanged() {
    let mut board = Board::own();
    board.place_ship(c(3, 0), c(3, 4)).unwrap();
    let before = board.clone();
    assert_eq!(board.place_ship(c(1, 2), c(5, 2)), Err(BoardError::ShipOverlaps));
    assert_eq!(board, before);
}

#[test]
fn diagonal_and_off_board_placements_fail() {
    let mut board = Board::own();
    assert_eq!(board.place_ship(c(0, 0), c(2, 2)), Err(BoardError::NotStraight(c(0, 0), c(2, 2))));
    assert_eq!(board.place_ship(c(0, 0), c(0, 12)), Err(BoardError::OutOfBounds(c(0, 12))));
    assert_eq!(board, Board::own());
}

#[test]
fn miss_then_ignore() {
    let mut board = Board::own();
    assert_eq!(board.resolve_shot(c(1, 1)).unwrap(), Outcome::Miss(c(1, 1)));
    assert_eq!(board.get(c(1, 1)).unwrap(), Cell::Miss);
    assert_eq!(board.resolve_shot(c(1, 1)).unwrap(), Outcome::Ignore);
}

#[test]
fn second_shot_on_wreck_is_ignored() {
    let mut board = Board::own();
    board.place_ship(c(0, 0), c(2, 0)).unwrap();
    assert_eq!(board.resolve_shot(c(1, 0)).unwrap(), Outcome::Hit(c(1, 0)));
    let after_first = board.clone();
    assert_eq!(board.resolve_shot(c(1, 0)).unwrap(), Outcome::Ignore);
    assert_eq!(board, after_first);
}

#[test]
fn ship_destroyed_only_by_last_segment() {
    let mut board = Board::own();
    board.place_ship(c(2, 0), c(2, 2)).unwrap();
    assert_eq!(board.resolve_shot(c(2, 1)).unwrap(), Outcome::Hit(c(2, 1)));
    assert_eq!(board.resolve_shot(c(2, 0)).unwrap(), Outcome::Hit(c(2, 0)));
    let span = Span::between(c(2, 0), c(2, 2)).unwrap();
    assert_eq!(board.resolve_shot(c(2, 2)).unwrap(), Outcome::Destroyed(span));
    assert!(board.get(c(2, 1)).unwrap().is_destroyed_ship());
    assert_eq!(board.live_ship_cells(), 0);
}

#[test]
fn destroyed_when_interior_segment_is_last() {
    let mut board = Board::own();
    board.place_ship(c(3, 6), c(7, 6)).unwrap();
    for x in [3, 7, 4, 6] {
        assert_eq!(board.resolve_shot(c(x, 6)).unwrap(), Outcome::Hit(c(x, 6)));
    }
    let span = Span::between(c(3, 6), c(7, 6)).unwrap();
    assert_eq!(board.resolve_shot(c(5, 6)).unwrap(), Outcome::Destroyed(span));
}

#[test]
fn adjacent_ship_does_not_count() {
    let mut board = Board::own();
    board.place_ship(c(0, 0), c(0, 1)).unwrap();
    board.place_ship(c(0, 2), c(0, 3)).unwrap();
    board.resolve_shot(c(0, 1)).unwrap();
    assert_eq!(
        board.resolve_shot(c(0, 0)).unwrap(),
        Outcome::Destroyed(Span::between(c(0, 0), c(0, 1)).unwrap())
    );
    assert_eq!(board.live_ship_cells(), 2);
}

#[test]
fn malformed_run_is_reported() {
    let mut board = Board::own();
    board.mark(c(5, 5), Cell::wreck(Part::Top)).unwrap();
    board.mark(c(5, 6), Cell::wreck(Part::Vertical)).unwrap();
    assert_eq!(board.destroyed_span(c(5, 5)), Err(BoardError::MalformedShip(c(5, 5))));
    board.mark(c(5, 6), Cell::ship(Part::Vertical)).unwrap();
    assert_eq!(board.resolve_shot(c(5, 6)), Err(BoardError::MalformedShip(c(5, 6))));
}

#[test]
fn remove_ship_clears_whole_run() {
    let mut board = Board::own();
    board.place_ship(c(1, 1), c(1, 4)).unwrap();
    let removed = board.remove_ship(c(1, 3)).unwrap();
    assert_eq!(removed, Span::between(c(1, 1), c(1, 4)).unwrap());
    assert_eq!(board, Board::own());
    assert_eq!(board.remove_ship(c(1, 3)), None);
}

#[test]
fn mark_destroyed_paints_caps() {
    let mut view = Board::enemy();
    view.mark_destroyed(Span::between(c(6, 2), c(8, 2)).unwrap()).unwrap();
    assert_eq!(view.get(c(6, 2)).unwrap(), Cell::wreck(Part::Left));
    assert_eq!(view.get(c(7, 2)).unwrap(), Cell::wreck(Part::Horizontal));
    assert_eq!(view.get(c(8, 2)).unwrap(), Cell::wreck(Part::Right));
    assert_eq!(view.get(c(5, 2)).unwrap(), Cell::Unknown);
}
