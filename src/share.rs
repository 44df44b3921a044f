//! Cast text for the Mini App "share" actions

/// Text for sharing a finished run
pub fn score_cast_text(score: u32) -> String {
    format!("I scored {score} in Stack Game! Can you beat my high score? #StackGame #Farcaster")
}

/// Text for the general "share the app" button
pub fn invite_cast_text() -> &'static str {
    "I'm playing Stack Game on Farcaster! #StackGame #Farcaster"
}

/// Whether the game-over overlay should offer sharing
pub fn can_share(score: u32) -> bool {
    score > 0
}
