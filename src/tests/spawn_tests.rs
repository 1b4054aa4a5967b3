#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::pieces::PieceType;
    use crate::spawn::{HoldOutcome, SpawnQueue};

    fn scripted(pieces: &[PieceType]) -> impl FnMut() -> PieceType + '_ {
        let mut next = pieces.iter();
        move || *next.next().expect("script ran out of pieces")
    }

    #[test]
    fn test_first_advance_draws_current_and_preview() {
        let script = [PieceType::T, PieceType::S, PieceType::Z];
        let mut draw = scripted(&script);
        let mut queue = SpawnQueue::new();

        assert_eq!(queue.advance_with(&mut draw), PieceType::T);
        assert_eq!(queue.current(), Some(PieceType::T));
        assert_eq!(queue.preview(), Some(PieceType::S));

        // The preview becomes current and one new piece is drawn
        assert_eq!(queue.advance_with(&mut draw), PieceType::S);
        assert_eq!(queue.preview(), Some(PieceType::Z));
    }

    #[test]
    fn test_hold_stores_then_swaps() {
        let script = [PieceType::T, PieceType::S, PieceType::Z];
        let mut draw = scripted(&script);
        let mut queue = SpawnQueue::new();
        queue.advance_with(&mut draw);

        assert_eq!(queue.hold(), HoldOutcome::Stored);
        assert_eq!(queue.held(), Some(PieceType::T));
        assert_eq!(queue.current(), None);

        queue.advance_with(&mut draw);
        assert_eq!(queue.current(), Some(PieceType::S));

        assert_eq!(queue.hold(), HoldOutcome::Swapped(PieceType::T));
        assert_eq!(queue.current(), Some(PieceType::T));
        assert_eq!(queue.held(), Some(PieceType::S));
        // Holding never touches the preview
        assert_eq!(queue.preview(), Some(PieceType::Z));
    }

    #[test]
    fn test_hold_with_nothing_current() {
        let mut queue = SpawnQueue::new();
        assert_eq!(queue.hold(), HoldOutcome::Empty);
        assert_eq!(queue.held(), None);
    }

    #[test]
    fn test_random_draws_cover_every_shape() {
        let mut queue = SpawnQueue::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(queue.advance());
        }
        assert_eq!(seen.len(), PieceType::ALL.len());
    }

    #[test]
    fn test_clear() {
        let mut queue = SpawnQueue::new();
        queue.advance();
        queue.hold();
        queue.clear();
        assert_eq!(queue.current(), None);
        assert_eq!(queue.preview(), None);
        assert_eq!(queue.held(), None);
    }
}
