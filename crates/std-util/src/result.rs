#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(e) => e,
            actual => {
                use std::fmt::Write;
                let mut msg = format!("expected `Err`; actual={:?}", actual);

                $(
                    write!(msg, ", ").unwrap();
                    write!(msg, $($t)*).unwrap();
                )?

                panic!("{}", msg);
            }
        }
    };
}

/// Asserts the expression fails with an error whose message contains
/// `$needle`, and returns the error.
#[macro_export]
macro_rules! assert_err_contains {
    ($e:expr, $needle:expr) => {{
        let err = $crate::assert_err!($e);
        let msg = err.to_string();
        assert!(
            msg.contains($needle),
            "expected error containing {:?}; actual={:?}",
            $needle,
            msg
        );
        err
    }};
}

#[macro_export]
macro_rules! assert_ok {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Ok(v) => v,
            actual => {
                #[allow(unused_mut)]
                let mut msg = format!("expected `Ok`; actual={:?}", actual);
                $(
                    msg.push_str(", ");
                    msg.push_str(&format!($($t)*));
                )?
                panic!("{}", msg);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn err_contains_returns_error() {
        let result: Result<(), String> = Err("duplicate key `user`".to_string());
        let err = assert_err_contains!(result, "duplicate key");
        assert_eq!(err, "duplicate key `user`");
    }

    #[test]
    #[should_panic(expected = "expected `Ok`; actual=Err(\"boom\"), while parsing")]
    fn ok_with_message() {
        let result: Result<(), &str> = Err("boom");
        assert_ok!(result, "while {}", "parsing");
    }
}
