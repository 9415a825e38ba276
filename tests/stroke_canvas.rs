use std::cell::RefCell;
use std::rc::Rc;

use egui::{Color32, Pos2, pos2, vec2};
use paint_view::{
    BrushMode, CanvasError, CanvasEvent, ContactEvent, Repaint, Segment, StrokeCanvas,
};

fn create_test_canvas() -> StrokeCanvas {
    StrokeCanvas::new(vec2(64.0, 64.0), 1.0)
}

/// Draw a stroke through `points`: begin on the first, move through the
/// middle ones and end on the last
fn draw(canvas: &mut StrokeCanvas, points: &[Pos2]) {
    canvas.begin_stroke(points[0]).unwrap();
    for pair in points[..points.len() - 1].windows(2) {
        canvas.extend_stroke(pair[0], pair[1]).unwrap();
    }
    let n = points.len();
    canvas.end_stroke(points[n - 2], points[n - 1]).unwrap();
}

#[test]
fn test_example_scenario() {
    let mut canvas = create_test_canvas();

    canvas.begin_stroke(pos2(0.0, 0.0)).unwrap();
    canvas.extend_stroke(pos2(0.0, 0.0), pos2(10.0, 0.0)).unwrap();

    // Anchor and control coincide: the angle is undefined, so lines are used
    let active = canvas.active_stroke().unwrap();
    assert_eq!(
        active.segments()[1],
        Segment::Lines { via: pos2(0.0, 0.0), to: pos2(5.0, 0.0) }
    );

    canvas.end_stroke(pos2(5.0, 0.0), pos2(10.0, 0.0)).unwrap();

    let strokes = canvas.strokes();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].segments().len(), 3);
    // The end step's anchor (5,0) sits on its control (5,0), so the zero-length
    // rule wins over a quad here: the stroke closes with two straight lines
    assert_eq!(
        strokes[0].segments()[2],
        Segment::Lines { via: pos2(5.0, 0.0), to: pos2(10.0, 0.0) }
    );
    assert_eq!(strokes[0].terminal_point(), pos2(10.0, 0.0));
    assert!(canvas.can_undo());
    assert!(!canvas.can_redo());
}

#[test]
fn test_segment_count_tracks_samples() {
    let mut canvas = create_test_canvas();
    canvas.begin_stroke(pos2(5.0, 5.0)).unwrap();

    let samples = [pos2(5.0, 5.0), pos2(12.0, 9.0), pos2(20.0, 20.0), pos2(22.0, 40.0)];
    for (i, pair) in samples.windows(2).enumerate() {
        canvas.extend_stroke(pair[0], pair[1]).unwrap();
        assert_eq!(canvas.active_stroke().unwrap().segments().len(), i + 2);
    }
    assert!(canvas.strokes().is_empty());

    canvas.end_stroke(pos2(22.0, 40.0), pos2(30.0, 44.0)).unwrap();
    assert_eq!(canvas.strokes().len(), 1);
    assert_eq!(canvas.strokes()[0].segments().len(), samples.len() + 1);
    assert_eq!(canvas.undone_len(), 0);
    assert!(canvas.active_stroke().is_none());
}

#[test]
fn test_move_lands_on_midpoint_and_end_on_sample() {
    let mut canvas = create_test_canvas();
    canvas.begin_stroke(pos2(0.0, 0.0)).unwrap();
    canvas.extend_stroke(pos2(10.0, 0.0), pos2(10.0, 10.0)).unwrap();
    assert_eq!(
        canvas.active_stroke().unwrap().segments()[1],
        Segment::Quad { control: pos2(10.0, 0.0), to: pos2(10.0, 5.0) }
    );

    canvas.end_stroke(pos2(10.0, 10.0), pos2(0.0, 10.0)).unwrap();
    assert_eq!(canvas.strokes()[0].terminal_point(), pos2(0.0, 10.0));
}

#[test]
fn test_undo_redo_round_trip() {
    let mut canvas = create_test_canvas();
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(10.0, 3.0), pos2(20.0, 12.0)]);
    draw(&mut canvas, &[pos2(30.0, 30.0), pos2(40.0, 35.0), pos2(50.0, 50.0)]);
    let before = canvas.strokes().to_vec();
    let image_before = canvas.snapshot().unwrap().data().to_vec();

    canvas.undo().unwrap();
    assert_eq!(canvas.strokes(), &before[..1]);
    assert_eq!(canvas.undone_len(), 1);
    assert!(canvas.can_redo());

    canvas.redo().unwrap();
    assert_eq!(canvas.strokes(), &before[..]);
    assert_eq!(canvas.undone_len(), 0);
    assert_eq!(canvas.snapshot().unwrap().data(), &image_before[..]);
}

#[test]
fn test_empty_history_refuses_undo_redo() {
    let mut canvas = create_test_canvas();
    assert_eq!(canvas.undo(), Err(CanvasError::NothingToUndo));
    assert_eq!(canvas.redo(), Err(CanvasError::NothingToRedo));
    assert!(canvas.take_repaint().is_none());
}

#[test]
fn test_new_stroke_discards_redo() {
    let mut canvas = create_test_canvas();
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(10.0, 3.0), pos2(20.0, 12.0)]);
    draw(&mut canvas, &[pos2(5.0, 40.0), pos2(15.0, 42.0), pos2(25.0, 50.0)]);
    canvas.undo().unwrap();
    assert!(canvas.can_redo());

    canvas.begin_stroke(pos2(50.0, 50.0)).unwrap();
    assert_eq!(canvas.undone_len(), 0);
    canvas.end_stroke(pos2(50.0, 50.0), pos2(55.0, 55.0)).unwrap();
    assert!(!canvas.can_redo());
    assert_eq!(canvas.strokes().len(), 2);
}

#[test]
fn test_undo_redo_unavailable_while_drawing() {
    let mut canvas = create_test_canvas();
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(10.0, 3.0), pos2(20.0, 12.0)]);
    canvas.undo().unwrap();
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(10.0, 3.0), pos2(20.0, 12.0)]);
    canvas.undo().unwrap();

    canvas.begin_stroke(pos2(3.0, 3.0)).unwrap();
    assert!(!canvas.can_undo());
    assert!(!canvas.can_redo());
    assert_eq!(canvas.undo(), Err(CanvasError::Busy));
    assert_eq!(canvas.redo(), Err(CanvasError::Busy));
}

#[test]
fn test_cleanup_while_drawing_is_noop() {
    let mut canvas = create_test_canvas();
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(10.0, 3.0), pos2(20.0, 12.0)]);

    canvas.begin_stroke(pos2(30.0, 30.0)).unwrap();
    canvas.extend_stroke(pos2(30.0, 30.0), pos2(40.0, 32.0)).unwrap();
    let active = canvas.active_stroke().unwrap().clone();

    assert_eq!(canvas.cleanup(), Err(CanvasError::Busy));
    assert_eq!(canvas.strokes().len(), 1);
    assert_eq!(canvas.active_stroke(), Some(&active));
    assert!(canvas.is_drawing());
}

#[test]
fn test_cleanup_clears_everything() {
    let mut canvas = create_test_canvas();
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(10.0, 3.0), pos2(20.0, 12.0)]);
    draw(&mut canvas, &[pos2(5.0, 40.0), pos2(15.0, 42.0), pos2(25.0, 50.0)]);
    canvas.undo().unwrap();

    canvas.cleanup().unwrap();
    assert!(canvas.strokes().is_empty());
    assert_eq!(canvas.undone_len(), 0);
    assert!(canvas.cached_snapshot().is_none());
    assert_eq!(canvas.take_repaint(), Some(Repaint::Full));
    assert!(canvas.snapshot().unwrap().pixels().iter().all(|p| p.alpha() == 0));
}

#[test]
fn test_brush_changes_mid_stroke_are_ignored() {
    let mut canvas = create_test_canvas();
    canvas.set_brush_color(Color32::RED).unwrap();
    canvas.set_brush_width(6.0).unwrap();

    canvas.begin_stroke(pos2(1.0, 1.0)).unwrap();
    assert_eq!(canvas.set_brush_color(Color32::GREEN), Err(CanvasError::Busy));
    assert_eq!(canvas.set_brush_width(2.0), Err(CanvasError::Busy));
    assert_eq!(canvas.set_mode(BrushMode::Eraser), Err(CanvasError::Busy));
    canvas.end_stroke(pos2(1.0, 1.0), pos2(9.0, 9.0)).unwrap();

    let stroke = &canvas.strokes()[0];
    assert_eq!(stroke.color(), Color32::RED);
    assert_eq!(stroke.width(), 6.0);
    assert!(!stroke.is_eraser());

    canvas.set_brush_color(Color32::GREEN).unwrap();
    canvas.set_mode(BrushMode::Eraser).unwrap();
    assert_eq!(canvas.current_mode(), BrushMode::Eraser);
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(5.0, 5.0), pos2(9.0, 9.0)]);
    assert_eq!(canvas.strokes()[1].color(), Color32::GREEN);
    assert!(canvas.strokes()[1].is_eraser());
}

#[test]
fn test_invalid_brush_width_rejected() {
    let mut canvas = create_test_canvas();
    assert_eq!(canvas.set_brush_width(0.0), Err(CanvasError::InvalidBrushWidth(0.0)));
    assert!(canvas.set_brush_width(-1.0).is_err());
    assert_eq!(canvas.brush().width, 1.0);
}

#[test]
fn test_samples_without_stroke_leave_history_alone() {
    let mut canvas = create_test_canvas();
    draw(&mut canvas, &[pos2(1.0, 1.0), pos2(10.0, 3.0), pos2(20.0, 12.0)]);
    let before = canvas.strokes().to_vec();

    assert_eq!(canvas.extend_stroke(pos2(0.0, 0.0), pos2(1.0, 1.0)), Err(CanvasError::NotDrawing));
    assert_eq!(canvas.end_stroke(pos2(0.0, 0.0), pos2(1.0, 1.0)), Err(CanvasError::NotDrawing));
    assert_eq!(canvas.strokes(), &before[..]);
}

#[test]
fn test_begin_while_drawing_is_rejected() {
    let mut canvas = create_test_canvas();
    canvas.begin_stroke(pos2(1.0, 1.0)).unwrap();
    assert_eq!(canvas.begin_stroke(pos2(9.0, 9.0)), Err(CanvasError::Busy));
    assert_eq!(canvas.active_stroke().unwrap().terminal_point(), pos2(1.0, 1.0));
}

#[test]
fn test_cancel_commits_like_end() {
    let mut ended = create_test_canvas();
    let mut cancelled = create_test_canvas();

    for (canvas, cancel) in [(&mut ended, false), (&mut cancelled, true)] {
        canvas.begin_stroke(pos2(2.0, 2.0)).unwrap();
        canvas.extend_stroke(pos2(2.0, 2.0), pos2(12.0, 6.0)).unwrap();
        if cancel {
            canvas.cancel_stroke(pos2(12.0, 6.0), pos2(20.0, 20.0)).unwrap();
        } else {
            canvas.end_stroke(pos2(12.0, 6.0), pos2(20.0, 20.0)).unwrap();
        }
    }

    assert!(!cancelled.is_drawing());
    assert_eq!(ended.strokes(), cancelled.strokes());
    assert_eq!(ended.snapshot().unwrap().data(), cancelled.snapshot().unwrap().data());
}

#[test]
fn test_snapshot_unavailable_while_drawing() {
    let mut canvas = create_test_canvas();
    canvas.begin_stroke(pos2(1.0, 1.0)).unwrap();
    assert_eq!(canvas.snapshot().err(), Some(CanvasError::Busy));
    // The cache exists for compositing but holds only committed strokes
    assert!(canvas.cached_snapshot().unwrap().pixels().iter().all(|p| p.alpha() == 0));
}

#[test]
fn test_incremental_snapshot_matches_full_rebuild() {
    let mut canvas = create_test_canvas();
    canvas.set_brush_width(4.0).unwrap();
    draw(&mut canvas, &[pos2(4.0, 4.0), pos2(30.0, 10.0), pos2(60.0, 40.0)]);
    canvas.set_mode(BrushMode::Eraser).unwrap();
    draw(&mut canvas, &[pos2(40.0, 0.0), pos2(35.0, 30.0), pos2(30.0, 60.0)]);
    let incremental = canvas.snapshot().unwrap().data().to_vec();

    // Undo + redo drops the cache; the next request rebuilds from scratch
    canvas.undo().unwrap();
    canvas.redo().unwrap();
    assert!(canvas.cached_snapshot().is_none());
    assert_eq!(canvas.snapshot().unwrap().data(), &incremental[..]);
}

#[test]
fn test_undo_drops_cached_snapshot() {
    let mut canvas = create_test_canvas();
    canvas.set_brush_width(6.0).unwrap();
    draw(&mut canvas, &[pos2(2.0, 32.0), pos2(32.0, 32.0), pos2(62.0, 32.0)]);
    assert!(canvas.cached_snapshot().is_some());
    assert!(canvas.snapshot().unwrap().pixel(32, 32).unwrap().alpha() > 0);

    canvas.undo().unwrap();
    assert!(canvas.cached_snapshot().is_none());
    assert_eq!(canvas.snapshot().unwrap().pixel(32, 32).unwrap().alpha(), 0);
}

#[test]
fn test_extend_requests_dirty_region_only() {
    let mut canvas = create_test_canvas();
    canvas.set_brush_width(2.0).unwrap();
    canvas.begin_stroke(pos2(10.0, 10.0)).unwrap();
    assert_eq!(canvas.take_repaint(), Some(Repaint::Full));

    canvas.extend_stroke(pos2(20.0, 10.0), pos2(20.0, 20.0)).unwrap();
    let Some(Repaint::Region(rect)) = canvas.take_repaint() else {
        panic!("expected a partial repaint");
    };
    assert_eq!(rect.min, pos2(8.0, 8.0));
    assert_eq!(rect.max, pos2(22.0, 17.0));
}

#[test]
fn test_hooks_fire_around_stroke() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut canvas = create_test_canvas();
    {
        let log = Rc::clone(&log);
        canvas.subscribe(move |event: &CanvasEvent| log.borrow_mut().push(*event));
    }

    canvas.set_mode(BrushMode::Eraser).unwrap();
    canvas.begin_stroke(pos2(1.0, 1.0)).unwrap();
    assert_eq!(*log.borrow(), vec![CanvasEvent::StrokeWillBegin { mode: BrushMode::Eraser }]);

    canvas.cancel_stroke(pos2(1.0, 1.0), pos2(4.0, 4.0)).unwrap();
    assert_eq!(
        log.borrow().last(),
        Some(&CanvasEvent::StrokeDidFinish { can_undo: true, can_redo: false })
    );
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn test_contact_events_drive_canvas() {
    let mut canvas = create_test_canvas();
    let events = [
        ContactEvent::Began { location: pos2(0.0, 0.0) },
        ContactEvent::Moved { location: pos2(10.0, 0.0), previous: pos2(0.0, 0.0) },
        ContactEvent::Ended { location: pos2(10.0, 0.0), previous: pos2(5.0, 0.0) },
    ];
    for event in events {
        canvas.handle_contact(event).unwrap();
    }
    assert_eq!(canvas.strokes().len(), 1);
    assert_eq!(canvas.strokes()[0].segments().len(), 3);
    assert!(!canvas.is_drawing());
}
