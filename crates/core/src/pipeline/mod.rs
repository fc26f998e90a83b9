pub mod enroll_face_use_case;
pub mod enrollment_template;
pub mod verification_decision;
pub mod verify_face_use_case;
