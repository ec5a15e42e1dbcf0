//! Static clinic knowledge base
//!
//! An explicit ordered list of topics. Order matters: the matcher's
//! containment pass is first-match-wins over this declared order, so
//! the list is the single source of match priority.

/// A named category of caller question with one canonical answer
#[derive(Debug, Clone)]
pub struct Topic {
    /// Identifier, also the similarity-pass comparison target
    pub name: String,
    /// Lowercase substrings whose presence selects this topic
    pub triggers: Vec<String>,
    /// Canonical spoken answer
    pub answer: String,
}

impl Topic {
    /// Create a topic from static text
    pub fn new(name: &str, triggers: &[&str], answer: &str) -> Self {
        Self {
            name: name.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            answer: answer.to_string(),
        }
    }
}

/// Ordered, immutable topic table loaded once at process start
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    topics: Vec<Topic>,
}

impl KnowledgeBase {
    /// Build a knowledge base from an ordered topic list
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// The clinic's built-in topic table
    pub fn builtin() -> Self {
        Self::new(vec![
            Topic::new(
                "hours",
                &["when do you open", "closing time", "what time", "operating hours", "are you open"],
                "Our clinic is open from 8 AM to 4 PM, Monday through Friday.",
            ),
            Topic::new(
                "services",
                &["what do you do", "help with", "can you treat", "available services", "medical services"],
                "We provide general check-ups, minor injury treatments, vaccinations, and more. \
                 Feel free to ask about specific services.",
            ),
            Topic::new(
                "insurance",
                &["do you take my insurance", "insurance accepted", "covered by insurance", "insurance plans"],
                "We accept a variety of insurance plans. Please call our billing department for \
                 specific details.",
            ),
            Topic::new(
                "cost",
                &["how much", "price", "fees", "charges", "expensive", "affordable", "payment", "pay"],
                "Costs vary depending on the service. We accept insurance and out-of-pocket \
                 payments. Contact our front desk for a price estimate.",
            ),
            Topic::new(
                "location",
                &["where are you", "address", "directions", "how do i get there", "find you"],
                "We are located at 123 Main Street in Springfield. You can find detailed \
                 directions on our website.",
            ),
            Topic::new(
                "wait time",
                &["how long", "wait times", "waiting period", "when will i be seen"],
                "Typical wait times range from 15 to 30 minutes. We do our best to keep your \
                 wait as short as possible.",
            ),
            Topic::new(
                "appointment",
                &["do i need to schedule", "can i walk in", "book appointment", "reservation"],
                "You can walk in during operating hours, but we recommend scheduling an \
                 appointment online or over the phone.",
            ),
            Topic::new(
                "documents",
                &["what to bring", "what do i need", "required documents", "paperwork"],
                "Please bring a valid ID, your insurance card, and any relevant medical records \
                 you have.",
            ),
            Topic::new(
                "covid",
                &["coronavirus", "covid test", "covid-19", "pcr test", "rapid test"],
                "We offer COVID-19 testing, including PCR and rapid tests. Please call ahead \
                 for availability.",
            ),
            Topic::new(
                "lab",
                &["blood work", "testing", "laboratory", "blood test", "urine test"],
                "Yes, we have an on-site lab for blood tests and basic diagnostics.",
            ),
            Topic::new(
                "xray",
                &["x ray", "xrays", "imaging", "radiography"],
                "We offer X-ray imaging services. A technician can assist you if needed during \
                 your visit.",
            ),
            Topic::new(
                "emergency",
                &["urgent", "emergency care", "serious condition", "life threatening"],
                "For life-threatening conditions, please call 911 or visit the nearest emergency \
                 room. We handle urgent but not critical emergencies.",
            ),
            Topic::new(
                "prescriptions",
                &["medicine", "medications", "refill", "prescription refill"],
                "If you need a prescription refill, please call our office and have your \
                 pharmacy information ready.",
            ),
            Topic::new(
                "children",
                &["pediatric", "kids", "child", "baby", "infant"],
                "We provide pediatric care for children of all ages.",
            ),
            Topic::new(
                "languages",
                &["spanish", "translator", "interpret", "habla español", "speak english"],
                "We have staff who speak Spanish and we can arrange for interpretation services \
                 if needed.",
            ),
            Topic::new(
                "payment plans",
                &["financial", "payment options", "installments", "financing", "monthly payments"],
                "We can discuss payment plans if you are uninsured or need financial assistance.",
            ),
            Topic::new(
                "providers",
                &["doctors", "physicians", "medical staff", "healthcare providers"],
                "Our team includes board-certified physicians, nurse practitioners, and \
                 physician assistants with diverse experience.",
            ),
            Topic::new(
                "follow up",
                &["after visit", "check up", "follow-up care", "subsequent visits"],
                "After your visit, we may schedule a follow-up appointment or provide \
                 instructions for at-home care.",
            ),
        ])
    }

    /// Topics in declared priority order
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Look up a topic by identifier
    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}
